mod config;
pub use config::GatewayConfig;

mod errors;
pub use errors::{ErrorKind, GatewayError};

mod handler;
pub use handler::{SessionGateway, TaskGateway};

mod redirect;
pub use redirect::{Redirect, RedirectTarget};

mod http;
pub use http::HttpGateway;
