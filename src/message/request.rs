use tracing::debug;

use crate::{
    client::GenerationRequest,
    input::TaskDescription,
    models::EquipmentSelection,
    prompt::PromptTemplate,
    shared::PipelineConfig,
};

/// Renders a template into a request for the configured model and mode.
pub fn generate_request(
    template: PromptTemplate,
    task: &TaskDescription,
    selection: Option<&EquipmentSelection>,
    config: &PipelineConfig,
) -> GenerationRequest {
    let prompt = template.render(task, selection);
    debug!("{} prompt rendered ({} bytes)", template, prompt.len());
    GenerationRequest::new(template, prompt, config.model.clone(), config.response_mode)
}

pub fn generate_equipment_request(task: &TaskDescription, config: &PipelineConfig) -> GenerationRequest {
    generate_request(PromptTemplate::EquipmentRecommendation, task, None, config)
}

pub fn generate_risk_table_request(
    task: &TaskDescription,
    selection: Option<&EquipmentSelection>,
    config: &PipelineConfig,
) -> GenerationRequest {
    generate_request(PromptTemplate::RiskTable, task, selection, config)
}
