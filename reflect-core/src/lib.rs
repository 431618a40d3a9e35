pub mod calendar;
pub mod config;
pub mod draft;
pub mod entry;
pub mod gateway;
pub mod nudges;
pub mod progress;
pub mod remote;
pub mod session;
pub mod undo;

pub use config::Config;
pub use draft::{Draft, EditBuffer};
pub use entry::{Entry, MoodCategory, Sentiment};
pub use gateway::{Gateway, GatewayError, SaveOutcome};
pub use progress::{AlertState, ProgressEngine, ProgressSnapshot};
pub use remote::RemoteGateway;
pub use session::{CloseOutcome, DeleteOutcome, SaveReport, Session, SessionError};
