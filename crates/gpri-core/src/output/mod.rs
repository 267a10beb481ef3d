//! Output computation and export

pub mod computed;
pub mod writer;

pub use computed::PullRequestOutputs;
pub use writer::{export_all, EnvExporter, EnvmanExporter, GithubOutputExporter, JsonExporter};
