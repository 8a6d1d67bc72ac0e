// SPDX-License-Identifier: GPL-3.0

#![doc = include_str!("../README.md")]
mod command;
mod errors;
mod registry;
mod run;
mod sink;
mod spec;
mod wipe;

pub use command::command;
pub use errors::Error;
pub use registry::{BASE_PORT, PORT_STRIDE, Peer, PeerArg, PeerRegistry};
pub use run::{launch, supervise};
pub use sink::{FLUSH_INTERVAL, LogSink};
pub use spec::{DevIdentity, LaunchOptions, LaunchSpec, Role};
pub use wipe::{SENTINEL, wipe_data};
