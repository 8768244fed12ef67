//! Event to payload encoding.

use binlog_types::*;

use crate::buffers::PayloadBuffer;
use crate::version::FormatVersion;

/// Writes one event's fields into a [`PayloadBuffer`] in wire order.
///
/// Fields introduced after `version` are left out entirely.
pub struct EventEncoder<'a> {
    buf: &'a mut PayloadBuffer,
    version: FormatVersion,
    log_environment: bool,
}

impl<'a> EventEncoder<'a> {
    pub fn new(buf: &'a mut PayloadBuffer, version: FormatVersion) -> Self {
        Self {
            buf,
            version,
            log_environment: true,
        }
    }

    /// Whether `BuildStarted` records keep their environment block.
    pub fn log_environment(mut self, enabled: bool) -> Self {
        self.log_environment = enabled;
        self
    }

    pub fn encode(&mut self, event: &BuildEvent) {
        match event {
            BuildEvent::BuildStarted(e) => {
                self.fields(&e.fields);
                let environment = e.environment.as_ref().filter(|_| self.log_environment);
                self.buf.opt_metadata(environment);
            }
            BuildEvent::BuildFinished(e) => {
                self.fields(&e.fields);
                self.buf.bool(e.succeeded);
            }
            BuildEvent::BuildCanceled(e) => self.fields(&e.fields),
            BuildEvent::BuildSubmissionStarted(e) => {
                self.fields(&e.fields);
                self.buf.i32(e.submission_id);
                self.buf.string_list(&e.entry_project_paths);
                self.buf.string_list(&e.target_names);
                self.buf.metadata(&e.global_properties);
                self.buf.u32(e.flags);
            }
            BuildEvent::ProjectStarted(e) => {
                self.fields(&e.fields);
                self.buf.i32(e.project_id);
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_str(e.target_names.as_deref());
                self.buf.opt_str(e.tools_version.as_deref());
                self.opt_context(e.parent_context.as_ref());
                self.buf.opt_metadata(e.global_properties.as_ref());
                self.buf.opt_metadata(e.properties.as_ref());
                self.item_groups(&e.items);
            }
            BuildEvent::ProjectFinished(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.bool(e.succeeded);
            }
            BuildEvent::TargetStarted(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.target_name.as_deref());
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_str(e.target_file.as_deref());
                self.buf.opt_str(e.parent_target.as_deref());
                self.buf.enum_value(e.build_reason);
            }
            BuildEvent::TargetFinished(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.target_name.as_deref());
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_str(e.target_file.as_deref());
                self.buf.bool(e.succeeded);
                self.task_items(&e.target_outputs);
            }
            BuildEvent::TargetSkipped(e) => self.target_skipped(e),
            BuildEvent::TaskStarted(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.task_name.as_deref());
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_str(e.task_file.as_deref());
                if self.version.supports(FormatVersion::TASK_LOCATION) {
                    self.buf.i32(e.line_number);
                    self.buf.i32(e.column_number);
                }
                if self.version.supports(FormatVersion::TASK_ASSEMBLY_LOCATION) {
                    self.buf.opt_str(e.task_assembly_location.as_deref());
                }
            }
            BuildEvent::TaskFinished(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.task_name.as_deref());
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_str(e.task_file.as_deref());
                self.buf.bool(e.succeeded);
            }
            BuildEvent::Error(e)
            | BuildEvent::Warning(e)
            | BuildEvent::BuildCheckWarning(e)
            | BuildEvent::BuildCheckError(e) => self.diagnostic_event(e),
            BuildEvent::Message(e)
            | BuildEvent::CriticalMessage(e)
            | BuildEvent::BuildCheckMessage(e) => self.message_event(e),
            BuildEvent::TaskCommandLine(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.command_line.as_deref());
                self.buf.opt_str(e.task_name.as_deref());
            }
            BuildEvent::ProjectEvaluationStarted(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.project_file.as_deref());
            }
            BuildEvent::ProjectEvaluationFinished(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.project_file.as_deref());
                self.buf.opt_metadata(e.global_properties.as_ref());
                self.buf.opt_metadata(e.properties.as_ref());
                self.item_groups(&e.items);
            }
            BuildEvent::ProjectImported(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.imported_project_file.as_deref());
                self.buf.opt_str(e.unexpanded_project.as_deref());
                self.buf.bool(e.import_ignored);
            }
            BuildEvent::PropertyReassignment(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.property_name.as_deref());
                self.buf.opt_str(e.previous_value.as_deref());
                self.buf.opt_str(e.new_value.as_deref());
                self.buf.opt_str(e.location.as_deref());
            }
            BuildEvent::UninitializedPropertyRead(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.property_name.as_deref());
            }
            BuildEvent::EnvironmentVariableRead(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.variable_name.as_deref());
            }
            BuildEvent::PropertyInitialValueSet(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.property_name.as_deref());
                self.buf.opt_str(e.property_value.as_deref());
                self.buf.opt_str(e.property_source.as_deref());
            }
            BuildEvent::TaskParameter(e) => {
                self.message_event(&e.message);
                self.buf.enum_value(e.kind);
                self.buf.opt_str(e.item_type.as_deref());
                self.task_items(&e.items);
                self.buf.opt_str(e.parameter_name.as_deref());
                self.buf.opt_str(e.property_name.as_deref());
            }
            BuildEvent::ResponseFileUsed(e) => {
                self.message_event(&e.message);
                self.buf.opt_str(e.response_file_path.as_deref());
            }
            BuildEvent::AssemblyLoad(e) => {
                self.fields(&e.fields);
                self.buf.enum_value(e.loading_context);
                self.buf.opt_str(e.loading_initiator.as_deref());
                self.buf.opt_str(e.assembly_name.as_deref());
                self.buf.opt_str(e.assembly_path.as_deref());
                self.buf.guid(&e.mvid);
                self.buf.opt_str(e.app_domain_name.as_deref());
            }
            BuildEvent::BuildCheckTracing(e) => {
                self.fields(&e.fields);
                self.buf.durations(&e.tracing_data);
            }
            BuildEvent::BuildCheckAcquisition(e) => {
                self.fields(&e.fields);
                self.buf.opt_str(e.acquisition_path.as_deref());
                self.buf.opt_str(e.project_path.as_deref());
            }
            BuildEvent::ExtendedError(e) | BuildEvent::ExtendedWarning(e) => {
                self.diagnostic_event(&e.base);
                self.extended(&e.extended);
            }
            BuildEvent::ExtendedMessage(e) | BuildEvent::ExtendedCriticalMessage(e) => {
                self.message_event(&e.base);
                self.extended(&e.extended);
            }
            BuildEvent::ExtendedCustom(e) => {
                self.fields(&e.fields);
                self.extended(&e.extended);
            }
        }
    }

    fn fields(&mut self, fields: &EventFields) {
        self.buf.opt_str(fields.message.as_deref());
        self.buf.opt_str(fields.help_keyword.as_deref());
        self.buf.opt_str(fields.sender_name.as_deref());
        self.buf.timestamp(fields.timestamp);
        self.buf.i32(fields.thread_id);
        self.opt_context(fields.context.as_ref());
    }

    fn opt_context(&mut self, context: Option<&BuildEventContext>) {
        if let Some(context) = context {
            self.buf.presence(true);
            self.context(context);
        } else {
            self.buf.presence(false);
        }
    }

    fn context(&mut self, context: &BuildEventContext) {
        self.buf.i32(context.submission_id);
        self.buf.i32(context.node_id);
        if self.version.supports(FormatVersion::EVALUATION_ID) {
            self.buf.i32(context.evaluation_id);
        }
        self.buf.i32(context.project_instance_id);
        self.buf.i32(context.project_context_id);
        self.buf.i32(context.target_id);
        self.buf.i32(context.task_id);
    }

    fn diagnostic(&mut self, diagnostic: &DiagnosticFields) {
        self.buf.opt_str(diagnostic.subcategory.as_deref());
        self.buf.opt_str(diagnostic.code.as_deref());
        self.buf.opt_str(diagnostic.file.as_deref());
        self.buf.opt_str(diagnostic.project_file.as_deref());
        self.buf.i32(diagnostic.line_number);
        self.buf.i32(diagnostic.column_number);
        self.buf.i32(diagnostic.end_line_number);
        self.buf.i32(diagnostic.end_column_number);
    }

    fn diagnostic_event(&mut self, event: &DiagnosticEvent) {
        self.fields(&event.fields);
        self.diagnostic(&event.diagnostic);
    }

    fn message_event(&mut self, event: &MessageEvent) {
        self.fields(&event.fields);
        self.diagnostic(&event.diagnostic);
        self.buf.enum_value(event.importance);
    }

    fn extended(&mut self, extended: &ExtendedData) {
        self.buf.str(&extended.extended_type);
        self.buf.opt_metadata(extended.metadata.as_ref());
        self.buf.opt_str(extended.data.as_deref());
    }

    fn target_skipped(&mut self, e: &TargetSkipped) {
        self.fields(&e.fields);
        self.buf.opt_str(e.target_name.as_deref());
        self.buf.opt_str(e.project_file.as_deref());
        self.buf.opt_str(e.target_file.as_deref());
        self.buf.opt_str(e.parent_target.as_deref());
        self.buf.enum_value(e.build_reason);
        if self.version.supports(FormatVersion::TARGET_SKIPPED_DETAILS) {
            self.buf.opt_str(e.condition.as_deref());
            self.buf.opt_str(e.evaluated_condition.as_deref());
            self.buf.bool(e.originally_succeeded);
            self.buf.enum_value(e.skip_reason);
            self.opt_context(e.original_context.as_ref());
        }
    }

    fn task_items(&mut self, items: &[TaskItem]) {
        self.buf.len_prefix(items.len());
        for item in items {
            self.buf.str(&item.item_spec);
            self.buf.metadata(&item.metadata);
        }
    }

    fn item_groups(&mut self, groups: &[ItemGroup]) {
        self.buf.len_prefix(groups.len());
        for group in groups {
            self.buf.str(&group.item_type);
            self.task_items(&group.items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn encode(event: &BuildEvent, version: FormatVersion) -> Vec<u8> {
        let mut buf = PayloadBuffer::new();
        EventEncoder::new(&mut buf, version).encode(event);
        buf.as_ref().to_vec()
    }

    #[test]
    fn test_build_canceled_layout() {
        let event = BuildEvent::BuildCanceled(BuildCanceled {
            fields: EventFields {
                message: Some("x".to_string()),
                help_keyword: None,
                sender_name: Some(String::new()),
                timestamp: Timestamp::from_ticks(2),
                context: Some(BuildEventContext::new(0, 1, 2, 3, 4, 5).with_evaluation_id(9)),
                thread_id: 7,
            },
        });
        let bytes = encode(&event, FormatVersion::CURRENT);
        assert_eq!(
            bytes,
            hex!("01 01 78 00 01 00 02 00 00 00 00 00 00 00 07 01 00 01 09 02 03 04 05").to_vec()
        );

        // Version 1 has no evaluation id.
        let bytes = encode(&event, FormatVersion::new(1));
        assert_eq!(
            bytes,
            hex!("01 01 78 00 01 00 02 00 00 00 00 00 00 00 07 01 00 01 02 03 04 05").to_vec()
        );
    }

    #[test]
    fn test_task_started_gates() {
        let event = BuildEvent::TaskStarted(TaskStarted {
            line_number: 3,
            column_number: 4,
            task_assembly_location: Some("a.dll".to_string()),
            ..Default::default()
        });
        let current = encode(&event, FormatVersion::CURRENT);
        let v8 = encode(&event, FormatVersion::TASK_LOCATION);
        let v7 = encode(&event, FormatVersion::new(7));
        // assembly location: presence + length + 5 bytes
        assert_eq!(current.len(), v8.len() + 7);
        assert_eq!(v8.len(), v7.len() + 2);
    }

    #[test]
    fn test_environment_suppressed() {
        let mut env = Metadata::new();
        env.insert("PATH".to_string(), "/bin".to_string());
        let event = BuildEvent::BuildStarted(BuildStarted {
            fields: EventFields::default(),
            environment: Some(env),
        });

        let mut buf = PayloadBuffer::new();
        EventEncoder::new(&mut buf, FormatVersion::CURRENT)
            .log_environment(false)
            .encode(&event);
        assert_eq!(buf.as_ref().last(), Some(&0u8));

        let full = encode(&event, FormatVersion::CURRENT);
        assert!(full.len() > buf.len());
    }
}
