use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid viewport: {0}")]
    Viewport(String),
    #[error("step {0}: {1}")]
    Step(usize, String),
}
