//! Client for the hello world greeter program
//!
//! Derives the payer's greeting account, creates it on first use, sends
//! greetings and reads back the counter the program keeps in it.

pub mod address;
pub mod config;
pub mod connection;
pub mod errors;
pub mod explorer;
pub mod identity;
pub mod instructions;
pub mod ledger;
pub mod session;
pub mod view;
pub mod watcher;

pub use config::Config;
pub use connection::Connection;
pub use errors::{GreeterError, Result};
pub use explorer::ExplorerLinks;
pub use identity::Identities;
pub use ledger::LedgerClient;
pub use session::{GreetOutcome, GreetState, GreeterSession, Provisioned};
pub use view::SessionView;
pub use watcher::CounterWatcher;
