//! Tether name plane — turns workload metadata into resolvable names.
//!
//! # Components
//!
//! - **`naming`** — derive fully-qualified domain names from workload metadata
//! - **`address`** — pick the best reachable address among network attachments
//! - **`registry`** — the concurrent FQDN→address map
//! - **`resolver`** — the resolve capability handed to the proxy

pub mod address;
pub mod naming;
pub mod registry;
pub mod resolver;

pub use address::select_address;
pub use naming::derive_fqdns;
pub use registry::NameRegistry;
pub use resolver::{ResolveError, Resolver};
