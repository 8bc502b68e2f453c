// Library exports for logroute

pub mod cli;
pub mod config;
pub mod destination;
pub mod error;
pub mod filter;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod router;

pub use config::LogRouteConfig;
pub use destination::{Destination, MemoryDestination, RotationPolicy, StreamDestination, TimedRotatingFile};
pub use error::{LogRouteError, Result};
pub use filter::{Filter, FuncNameFilter, NameFilter};
pub use level::Level;
pub use logger::{Logger, LoggerConfig, Registry};
pub use record::{CallSite, LogRecord};
pub use router::{LogRouter, RouteTable};
