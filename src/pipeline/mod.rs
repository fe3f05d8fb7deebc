//! One-stage and two-stage risk table flows over shared components.

use tracing::{error, info, warn};

use crate::{
    client::{GenerationClient, GenerationRequest},
    draft::{DraftEdits, merge_draft},
    error::PipelineError,
    extract::{Expect, extract_json},
    input::{RawTaskInput, TaskDescription},
    message::{generate_equipment_request, generate_risk_table_request},
    models::{EquipmentDraft, EquipmentSelection, RiskTable},
    shared::{PipelineConfig, Session},
    validate::{ContractWarning, check_contract, parse_draft, validate_table},
};

pub struct RiskPipeline<C> {
    client: C,
    config: PipelineConfig,
}

impl<C: GenerationClient> RiskPipeline<C> {
    pub fn new(client: C, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes raw form input with the configured tag catalog.
    pub fn normalize(&self, raw: RawTaskInput) -> TaskDescription {
        TaskDescription::from_raw(raw, &self.config.tags)
    }

    /// First round of the two-stage flow: proposes preparation lists and
    /// stores them as the session's draft.
    pub async fn recommend_equipment<'s>(
        &self,
        session: &'s mut Session,
        task: &TaskDescription,
    ) -> Result<&'s EquipmentDraft, PipelineError> {
        let request = generate_equipment_request(task, &self.config);
        let draft = self
            .call(session, &request)
            .await
            .and_then(|raw| {
                let value = extract_json(&raw, Expect::Object)?;
                Ok(parse_draft(&value)?)
            })
            .inspect_err(|e| error!("equipment recommendation failed: {}", e))?;

        info!(
            "session {} received equipment draft ({} protectors, {} tools)",
            session.id,
            draft.protectors.len(),
            draft.tools.len()
        );
        Ok(session.replace_draft(draft))
    }

    /// Generates, parses and scores a risk table, replacing the session's
    /// current table only on success.
    pub async fn generate_risk_table<'s>(
        &self,
        session: &'s mut Session,
        task: &TaskDescription,
        selection: Option<&EquipmentSelection>,
    ) -> Result<&'s RiskTable, PipelineError> {
        let (table, warnings) = self.produce_table(session, task, selection).await?;
        Ok(session.replace_table(table, warnings))
    }

    /// One generation round straight from the task description.
    pub async fn run_single_stage<'s>(
        &self,
        session: &'s mut Session,
        task: &TaskDescription,
    ) -> Result<&'s RiskTable, PipelineError> {
        self.generate_risk_table(session, task, None).await
    }

    /// Two generation rounds with the user's edits merged in between. An
    /// existing session draft is reused instead of asking again, and is
    /// discarded once the table has been produced.
    pub async fn run_two_stage<'s>(
        &self,
        session: &'s mut Session,
        task: &TaskDescription,
        edits: &DraftEdits,
    ) -> Result<&'s RiskTable, PipelineError> {
        let existing = session.draft().cloned();
        let draft = match existing {
            Some(draft) => draft,
            None => self.recommend_equipment(session, task).await?.clone(),
        };
        let selection = merge_draft(&draft, edits);

        let (table, warnings) = self.produce_table(session, task, Some(&selection)).await?;
        session.discard_draft();
        Ok(session.replace_table(table, warnings))
    }

    async fn produce_table(
        &self,
        session: &Session,
        task: &TaskDescription,
        selection: Option<&EquipmentSelection>,
    ) -> Result<(RiskTable, Vec<ContractWarning>), PipelineError> {
        if !task.has_task_name() {
            warn!("generating a risk table without a task name");
        }

        let request = generate_risk_table_request(task, selection, &self.config);
        let table = self
            .call(session, &request)
            .await
            .and_then(|raw| {
                let value = extract_json(&raw, Expect::Array)?;
                Ok(validate_table(&value)?)
            })
            .inspect_err(|e| error!("risk table generation failed: {}", e))?
            .with_model(self.config.model.clone());

        let warnings = check_contract(&table.rows);
        info!(
            "session {} risk table generated: {} rows, {} contract warnings",
            session.id,
            table.len(),
            warnings.len()
        );
        Ok((table, warnings))
    }

    async fn call(&self, session: &Session, request: &GenerationRequest) -> Result<String, PipelineError> {
        let api_key = session.api_key().ok_or(PipelineError::MissingCredential)?;
        info!(
            "session {} sending {} request to {} ({:?} mode)",
            session.id, request.template, request.model, request.mode
        );
        Ok(self.client.generate(api_key, request).await?)
    }
}
