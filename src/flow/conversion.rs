use super::document::FlowDocument;
use crate::error::LoadError;

/// A trait for custom front-end formats that can be converted into a
/// [`FlowDocument`].
///
/// The compiler only operates on the canonical document model. If your
/// pipelines live in a different shape (a YAML dialect, a database row, an
/// editor's scene graph), implement this trait on your own structs to
/// provide the translation layer.
///
/// # Example
///
/// ```rust,no_run
/// use nagare::flow::{FlowDocument, IntoFlowDocument};
/// use nagare::error::LoadError;
///
/// struct MyPipelineFile { json: String }
///
/// impl IntoFlowDocument for MyPipelineFile {
///     fn into_flow_document(self) -> Result<FlowDocument, LoadError> {
///         // Your logic to map your format onto PipelineDefinition values.
///         FlowDocument::from_json(&self.json)
///     }
/// }
/// ```
pub trait IntoFlowDocument {
    /// Consumes the object and converts it into a compilable flow document.
    fn into_flow_document(self) -> Result<FlowDocument, LoadError>;
}

impl IntoFlowDocument for FlowDocument {
    fn into_flow_document(self) -> Result<FlowDocument, LoadError> {
        Ok(self)
    }
}
