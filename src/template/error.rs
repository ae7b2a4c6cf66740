use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template render error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    #[error("Template syntax error: {0}")]
    SyntaxError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
