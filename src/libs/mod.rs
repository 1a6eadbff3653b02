//! Core library modules for the ccks application.
//!
//! Domain models, configuration, error taxonomy and the presentation helpers
//! shared by the commands.
//!
//! ```rust,no_run
//! use ccks::libs::team::MemberSelection;
//!
//! let mut staged = MemberSelection::from_iter([1, 2, 3]);
//! staged.remove(1);
//! staged.add(4);
//! assert_eq!(staged.ids(), vec![2, 3, 4]);
//! ```

pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod error;
pub mod logging;
pub mod messages;
pub mod password;
pub mod project;
pub mod task;
pub mod team;
pub mod user;
pub mod view;
