//! The five facility service implementations.
//!
//! Each service owns its durable catalog state (shelves, vault, roster,
//! curriculum), parses incoming params into a closed per-action request
//! enum, and commits mutations only after every guard has passed.

pub mod guild;
pub mod inn;
pub mod magic_guild;
pub mod shop;
pub mod temple;

pub use guild::GuildService;
pub use inn::InnService;
pub use magic_guild::MagicGuildService;
pub use shop::ShopService;
pub use temple::TempleService;
