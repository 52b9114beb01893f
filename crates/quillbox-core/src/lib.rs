pub mod note;
pub mod tags;
pub mod time;
pub mod user;

pub use note::{Note, NoteChanges, NoteDraft, NoteId};
pub use tags::TagFilter;
pub use time::now_utc;
pub use user::{User, UserId, generate_user_id};
