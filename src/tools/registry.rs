use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Arc;

use super::batch::{parse_date, weekday_slots, MAX_BATCH_DAYS};
use super::definitions::{format_tools_for_llm, ToolKind};
use super::error::{ToolError, ToolResult};
use super::invocation::{AddSlotArgs, AvailabilityArgs, BatchScheduleArgs, BookingArgs, ToolInvocation};
use super::sanitize::sanitize_contact_info;
use crate::models::ToolCall;
use crate::store::SchedulingStore;

/// Executes tool calls against the scheduling store.
///
/// This is the only component that mutates the schedule. Every failure is
/// turned into a `ToolResult::Error` so the conversation can carry on.
pub struct ToolRegistry {
    store: Arc<dyn SchedulingStore>,
    admin_password: SecretString,
    tools: Vec<Value>,
}

impl ToolRegistry {
    pub fn new(store: Arc<dyn SchedulingStore>, admin_password: SecretString) -> Self {
        Self {
            store,
            admin_password,
            tools: format_tools_for_llm(),
        }
    }

    /// Tool declarations sent with every completion request.
    pub fn schema(&self) -> &[Value] {
        &self.tools
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let outcome = match ToolInvocation::parse(call) {
            Ok(invocation) => {
                tracing::debug!(call_id = %call.id, tool = invocation.kind().name(), ?invocation, "Executing tool");
                self.dispatch(invocation).await
            }
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(_) => tracing::info!(tool = %call.function.name, call_id = %call.id, "Tool succeeded"),
            Err(err) => tracing::warn!(tool = %call.function.name, call_id = %call.id, error = %err, "Tool failed"),
        }

        ToolResult::from(outcome)
    }

    pub async fn dispatch(&self, invocation: ToolInvocation) -> Result<Value, ToolError> {
        if invocation.kind().is_restricted() {
            self.authorize(invocation.admin_password().unwrap_or_default())?;
        }

        match invocation {
            ToolInvocation::GetAvailability(args) => self.get_availability(args).await,
            ToolInvocation::BookSlot(args) => self.book_slot(args).await,
            ToolInvocation::AddSlot(args) => self.add_slot(args).await,
            ToolInvocation::CreateBatchSchedule(args) => self.create_batch_schedule(args).await,
        }
    }

    fn authorize(&self, provided: &str) -> Result<(), ToolError> {
        let expected = self.admin_password.expose_secret();
        if expected.is_empty() || provided != expected {
            return Err(ToolError::Unauthorized);
        }
        Ok(())
    }

    async fn get_availability(&self, args: AvailabilityArgs) -> Result<Value, ToolError> {
        let date = args.date.trim();
        let subject = args.subject.trim();
        let slots = self.store.find_available(date, subject).await?;

        Ok(json!({
            "date": date,
            "subject": subject,
            "count": slots.len(),
            "slots": slots,
        }))
    }

    async fn book_slot(&self, args: BookingArgs) -> Result<Value, ToolError> {
        let kind = ToolKind::BookSlot.name();
        let student_name = args.student_name.trim();
        if student_name.is_empty() {
            return Err(ToolError::invalid(kind, "studentName must not be blank"));
        }
        let contact_info = sanitize_contact_info(&args.contact_info);
        if contact_info.is_empty() {
            return Err(ToolError::invalid(kind, "contactInfo must not be blank"));
        }

        let slot = args.slot();
        self.store.book_if_free(&slot, student_name, &contact_info).await?;

        Ok(json!({
            "success": true,
            "message": format!(
                "Booked {} with {} on {} at {} for {}.",
                slot.subject, slot.teacher, slot.date, slot.time, student_name
            ),
        }))
    }

    async fn add_slot(&self, args: AddSlotArgs) -> Result<Value, ToolError> {
        let slot = args.slot();
        self.store.append_slot(&slot).await?;

        Ok(json!({
            "success": true,
            "slot": slot,
        }))
    }

    async fn create_batch_schedule(&self, args: BatchScheduleArgs) -> Result<Value, ToolError> {
        let kind = ToolKind::CreateBatchSchedule.name();
        let start = parse_date(&args.start_date)
            .ok_or_else(|| ToolError::invalid(kind, "startDate must be a valid YYYY-MM-DD date"))?;
        if !args.days.is_finite() || args.days < 0.0 || args.days.fract() != 0.0 || args.days > f64::from(MAX_BATCH_DAYS) {
            return Err(ToolError::invalid(
                kind,
                format!("days must be a whole number between 0 and {}", MAX_BATCH_DAYS),
            ));
        }

        let slots = weekday_slots(start, args.days as u32, &args.subject, &args.teacher);
        let created = if slots.is_empty() {
            0
        } else {
            self.store.append_slots(&slots).await?
        };

        Ok(json!({
            "success": true,
            "created": created,
            "startDate": start.format("%Y-%m-%d").to_string(),
            "days": args.days as u32,
        }))
    }
}
