// Interface adapters: hosted backend clients, wire protocol and navigation.

pub mod clients;
pub mod navigation;
pub mod protocol;
pub mod state;
