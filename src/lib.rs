//! Manifold API: manifest-driven REST backend library. Consumers describe their
//! model and route modules in a [`registry::manifest::Manifest`] and hand it to
//! [`lifecycle::start`], which registers everything, migrates, seeds, and returns
//! a router ready to serve.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod lifecycle;
pub mod migration;
pub mod models;
pub mod naming;
pub mod registry;
pub mod response;
pub mod router;
pub mod routes;
pub mod seed;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod validation;

pub use error::{AppError, RegistryError};
pub use lifecycle::{start, App, Phase};
pub use registry::manifest::{Manifest, ModuleDef, ModuleLoader, PackageDef};
pub use registry::schema::{ColumnDef, SchemaRegistry, TableDef};
pub use registry::{ModulePayload, ModuleRecord, ModuleRegistry};
pub use router::{Guard, MountRecord, RouteModule};
pub use settings::{Environment, Settings};
pub use state::AppContext;
