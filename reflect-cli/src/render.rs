use chrono::NaiveDate;
use reflect_core::progress::{AlertState, ProgressEngine};
use reflect_core::{Entry, MoodCategory};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

const RING_WIDTH: usize = 14;

pub struct Renderer {
    skin: MadSkin,
    date_format: String,
}

impl Renderer {
    pub fn new(date_format: &str) -> Self {
        let mut skin = MadSkin::default();
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        Self {
            skin,
            date_format: date_format.to_string(),
        }
    }

    pub fn print_md(&self, md: &str) {
        self.skin.print_text(md);
    }

    pub fn print_info(&self, message: &str) {
        self.skin.print_text(&format!("*{message}*\n"));
    }

    pub fn print_entry(&self, date: NaiveDate, entry: &Entry) {
        let header = date.format(&self.date_format).to_string();
        let mood = entry
            .sentiment
            .as_ref()
            .map(|s| format!(" {} {}", s.mood.emoji(), s.mood.label()))
            .unwrap_or_default();
        let mut md = format!("# {header}{mood}\n\n{}\n", entry.text.trim_end());
        if !entry.tags.is_empty() {
            md.push_str(&format!("\n**tags:** {}\n", entry.tags.join(", ")));
        }
        if !entry.photos.is_empty() {
            md.push_str(&format!("\n*{} photo(s) attached*\n", entry.photos.len()));
        }
        self.print_md(&md);
    }

    pub fn print_mood(&self, mood: MoodCategory) {
        self.print_info(&format!("Mood: {} {}", mood.emoji(), mood.label()));
    }

    pub fn print_stats(&self, engine: &ProgressEngine) {
        self.print_md(&stats_markdown(engine));
    }

    pub fn print_celebration(&self, milestone: u32) {
        self.print_md(&format!(
            "# 🎉 {milestone}-day streak!\nA milestone worth celebrating. Keep writing.\n"
        ));
    }
}

/// Text rendition of the streak ring: a fixed-width bar filled to the
/// ring fraction.
fn ring_bar(progress: f64) -> String {
    let filled = (progress * RING_WIDTH as f64).round() as usize;
    let filled = filled.min(RING_WIDTH);
    format!("[{}{}]", "●".repeat(filled), "○".repeat(RING_WIDTH - filled))
}

fn stats_markdown(engine: &ProgressEngine) -> String {
    let snap = engine.snapshot();
    let mut md = String::from("# Journal\n\n");

    let ring = ring_bar(engine.streak_ring_progress());
    md.push_str(&format!(
        "**Streak** {ring} {} day{}\n\n",
        snap.current_streak,
        if snap.current_streak == 1 { "" } else { "s" }
    ));
    md.push_str(&format!(
        "This week {} · This month {} · Total {}\n\n",
        snap.this_week, snap.this_month, snap.total_entries
    ));

    match engine.alert_state() {
        AlertState::AtRisk => md.push_str(&format!(
            "**⚠ Streak at risk** — about {:.0} hours left today.\n\n",
            snap.hours_remaining
        )),
        AlertState::Reminder => {
            md.push_str("You haven't journaled yet today.\n\n");
        }
        AlertState::None => {}
    }

    if let Some(goal) = &snap.weekly_goal {
        if engine.weekly_goal_completed() {
            md.push_str(&format!(
                "**Weekly goal complete:** {}/{} 🎯\n\n",
                goal.current, goal.target
            ));
        } else {
            md.push_str(&format!(
                "Weekly goal: {}/{} ({}%)\n\n",
                goal.current, goal.target, goal.progress
            ));
        }
    }

    if let Some(next) = &snap.next_milestone {
        md.push_str(&format!(
            "Next milestone: {} days — {} to go.\n\n",
            next.days, next.remaining
        ));
    }

    if !snap.badges.is_empty() {
        md.push_str("## Badges\n");
        for badge in &snap.badges {
            let mark = if badge.achieved { "✓" } else { "·" };
            md.push_str(&format!("* {} {} {}\n", mark, badge.icon(), badge.label));
        }
    }

    if let Some(message) = &snap.encouragement {
        md.push_str(&format!("\n*{message}*\n"));
    }
    md
}
