//! Payload to event decoding.

use binlog_types::*;

use crate::error::{FieldError, FieldResult};
use crate::payload::PayloadReader;
use crate::version::FormatVersion;

/// Reads one event back out of a record payload.
///
/// Fields introduced after `version` are not read; they keep their defaults.
/// The decoder stops after the last field it knows, so
/// [`EventDecoder::unread`] tells the caller whether the payload carried more.
pub struct EventDecoder<'a> {
    r: PayloadReader<'a>,
    version: FormatVersion,
}

impl<'a> EventDecoder<'a> {
    pub fn new(payload: &'a [u8], version: FormatVersion) -> Self {
        Self {
            r: PayloadReader::new(payload),
            version,
        }
    }

    /// Payload bytes left after decoding.
    pub fn unread(&self) -> &'a [u8] {
        self.r.rest()
    }

    pub fn consumed(&self) -> usize {
        self.r.position()
    }

    /// Decode a structured event of `kind`.
    ///
    /// Blob kinds and the terminator have no field layout and are rejected.
    pub fn decode(&mut self, kind: EventKind) -> FieldResult<BuildEvent> {
        let event = match kind {
            EventKind::BuildStarted => BuildEvent::BuildStarted(BuildStarted {
                fields: self.fields()?,
                environment: self.r.opt_metadata("environment")?,
            }),
            EventKind::BuildFinished => BuildEvent::BuildFinished(BuildFinished {
                fields: self.fields()?,
                succeeded: self.r.bool("succeeded")?,
            }),
            EventKind::BuildCanceled => BuildEvent::BuildCanceled(BuildCanceled {
                fields: self.fields()?,
            }),
            EventKind::BuildSubmissionStarted => {
                BuildEvent::BuildSubmissionStarted(BuildSubmissionStarted {
                    fields: self.fields()?,
                    submission_id: self.r.i32("submission_id")?,
                    entry_project_paths: self.r.string_list("entry_project_paths")?,
                    target_names: self.r.string_list("target_names")?,
                    global_properties: self.r.metadata("global_properties")?,
                    flags: self.r.u32("flags")?,
                })
            }
            EventKind::ProjectStarted => BuildEvent::ProjectStarted(ProjectStarted {
                fields: self.fields()?,
                project_id: self.r.i32("project_id")?,
                project_file: self.r.opt_str("project_file")?,
                target_names: self.r.opt_str("target_names")?,
                tools_version: self.r.opt_str("tools_version")?,
                parent_context: self.opt_context("parent_context")?,
                global_properties: self.r.opt_metadata("global_properties")?,
                properties: self.r.opt_metadata("properties")?,
                items: self.item_groups()?,
            }),
            EventKind::ProjectFinished => BuildEvent::ProjectFinished(ProjectFinished {
                fields: self.fields()?,
                project_file: self.r.opt_str("project_file")?,
                succeeded: self.r.bool("succeeded")?,
            }),
            EventKind::TargetStarted => BuildEvent::TargetStarted(TargetStarted {
                fields: self.fields()?,
                target_name: self.r.opt_str("target_name")?,
                project_file: self.r.opt_str("project_file")?,
                target_file: self.r.opt_str("target_file")?,
                parent_target: self.r.opt_str("parent_target")?,
                build_reason: self.r.enum_value("build_reason")?,
            }),
            EventKind::TargetFinished => BuildEvent::TargetFinished(TargetFinished {
                fields: self.fields()?,
                target_name: self.r.opt_str("target_name")?,
                project_file: self.r.opt_str("project_file")?,
                target_file: self.r.opt_str("target_file")?,
                succeeded: self.r.bool("succeeded")?,
                target_outputs: self.task_items("target_outputs")?,
            }),
            EventKind::TargetSkipped => BuildEvent::TargetSkipped(self.target_skipped()?),
            EventKind::TaskStarted => BuildEvent::TaskStarted(self.task_started()?),
            EventKind::TaskFinished => BuildEvent::TaskFinished(TaskFinished {
                fields: self.fields()?,
                task_name: self.r.opt_str("task_name")?,
                project_file: self.r.opt_str("project_file")?,
                task_file: self.r.opt_str("task_file")?,
                succeeded: self.r.bool("succeeded")?,
            }),
            EventKind::Error => BuildEvent::Error(self.diagnostic_event()?),
            EventKind::Warning => BuildEvent::Warning(self.diagnostic_event()?),
            EventKind::BuildCheckWarning => BuildEvent::BuildCheckWarning(self.diagnostic_event()?),
            EventKind::BuildCheckError => BuildEvent::BuildCheckError(self.diagnostic_event()?),
            EventKind::Message => BuildEvent::Message(self.message_event()?),
            EventKind::CriticalMessage => BuildEvent::CriticalMessage(self.message_event()?),
            EventKind::BuildCheckMessage => BuildEvent::BuildCheckMessage(self.message_event()?),
            EventKind::TaskCommandLine => BuildEvent::TaskCommandLine(TaskCommandLine {
                message: self.message_event()?,
                command_line: self.r.opt_str("command_line")?,
                task_name: self.r.opt_str("task_name")?,
            }),
            EventKind::ProjectEvaluationStarted => {
                BuildEvent::ProjectEvaluationStarted(ProjectEvaluationStarted {
                    fields: self.fields()?,
                    project_file: self.r.opt_str("project_file")?,
                })
            }
            EventKind::ProjectEvaluationFinished => {
                BuildEvent::ProjectEvaluationFinished(ProjectEvaluationFinished {
                    fields: self.fields()?,
                    project_file: self.r.opt_str("project_file")?,
                    global_properties: self.r.opt_metadata("global_properties")?,
                    properties: self.r.opt_metadata("properties")?,
                    items: self.item_groups()?,
                })
            }
            EventKind::ProjectImported => BuildEvent::ProjectImported(ProjectImported {
                message: self.message_event()?,
                imported_project_file: self.r.opt_str("imported_project_file")?,
                unexpanded_project: self.r.opt_str("unexpanded_project")?,
                import_ignored: self.r.bool("import_ignored")?,
            }),
            EventKind::PropertyReassignment => {
                BuildEvent::PropertyReassignment(PropertyReassignment {
                    message: self.message_event()?,
                    property_name: self.r.opt_str("property_name")?,
                    previous_value: self.r.opt_str("previous_value")?,
                    new_value: self.r.opt_str("new_value")?,
                    location: self.r.opt_str("location")?,
                })
            }
            EventKind::UninitializedPropertyRead => {
                BuildEvent::UninitializedPropertyRead(UninitializedPropertyRead {
                    message: self.message_event()?,
                    property_name: self.r.opt_str("property_name")?,
                })
            }
            EventKind::EnvironmentVariableRead => {
                BuildEvent::EnvironmentVariableRead(EnvironmentVariableRead {
                    message: self.message_event()?,
                    variable_name: self.r.opt_str("variable_name")?,
                })
            }
            EventKind::PropertyInitialValueSet => {
                BuildEvent::PropertyInitialValueSet(PropertyInitialValueSet {
                    message: self.message_event()?,
                    property_name: self.r.opt_str("property_name")?,
                    property_value: self.r.opt_str("property_value")?,
                    property_source: self.r.opt_str("property_source")?,
                })
            }
            EventKind::TaskParameter => BuildEvent::TaskParameter(TaskParameter {
                message: self.message_event()?,
                kind: self.r.enum_value("parameter_kind")?,
                item_type: self.r.opt_str("item_type")?,
                items: self.task_items("items")?,
                parameter_name: self.r.opt_str("parameter_name")?,
                property_name: self.r.opt_str("property_name")?,
            }),
            EventKind::ResponseFileUsed => BuildEvent::ResponseFileUsed(ResponseFileUsed {
                message: self.message_event()?,
                response_file_path: self.r.opt_str("response_file_path")?,
            }),
            EventKind::AssemblyLoad => BuildEvent::AssemblyLoad(AssemblyLoad {
                fields: self.fields()?,
                loading_context: self.r.enum_value("loading_context")?,
                loading_initiator: self.r.opt_str("loading_initiator")?,
                assembly_name: self.r.opt_str("assembly_name")?,
                assembly_path: self.r.opt_str("assembly_path")?,
                mvid: self.r.guid("mvid")?,
                app_domain_name: self.r.opt_str("app_domain_name")?,
            }),
            EventKind::BuildCheckTracing => BuildEvent::BuildCheckTracing(BuildCheckTracing {
                fields: self.fields()?,
                tracing_data: self.r.durations("tracing_data")?,
            }),
            EventKind::BuildCheckAcquisition => {
                BuildEvent::BuildCheckAcquisition(BuildCheckAcquisition {
                    fields: self.fields()?,
                    acquisition_path: self.r.opt_str("acquisition_path")?,
                    project_path: self.r.opt_str("project_path")?,
                })
            }
            EventKind::ExtendedError => BuildEvent::ExtendedError(ExtendedDiagnostic {
                base: self.diagnostic_event()?,
                extended: self.extended()?,
            }),
            EventKind::ExtendedWarning => BuildEvent::ExtendedWarning(ExtendedDiagnostic {
                base: self.diagnostic_event()?,
                extended: self.extended()?,
            }),
            EventKind::ExtendedMessage => BuildEvent::ExtendedMessage(ExtendedMessage {
                base: self.message_event()?,
                extended: self.extended()?,
            }),
            EventKind::ExtendedCriticalMessage => {
                BuildEvent::ExtendedCriticalMessage(ExtendedMessage {
                    base: self.message_event()?,
                    extended: self.extended()?,
                })
            }
            EventKind::ExtendedCustom => BuildEvent::ExtendedCustom(ExtendedCustom {
                fields: self.fields()?,
                extended: self.extended()?,
            }),
            EventKind::EndOfFile | EventKind::ProjectImportArchive => {
                return Err(FieldError::format(
                    "kind",
                    0,
                    format!("{kind} records have no field layout"),
                ));
            }
        };
        Ok(event)
    }

    fn fields(&mut self) -> FieldResult<EventFields> {
        Ok(EventFields {
            message: self.r.opt_str("message")?,
            help_keyword: self.r.opt_str("help_keyword")?,
            sender_name: self.r.opt_str("sender_name")?,
            timestamp: self.r.timestamp("timestamp")?,
            thread_id: self.r.i32("thread_id")?,
            context: self.opt_context("context")?,
        })
    }

    fn opt_context(&mut self, field: &'static str) -> FieldResult<Option<BuildEventContext>> {
        if !self.r.presence(field)? {
            return Ok(None);
        }
        let submission_id = self.r.i32(field)?;
        let node_id = self.r.i32(field)?;
        let evaluation_id = if self.version.supports(FormatVersion::EVALUATION_ID) {
            self.r.i32(field)?
        } else {
            BuildEventContext::INVALID_ID
        };
        Ok(Some(BuildEventContext {
            submission_id,
            node_id,
            evaluation_id,
            project_instance_id: self.r.i32(field)?,
            project_context_id: self.r.i32(field)?,
            target_id: self.r.i32(field)?,
            task_id: self.r.i32(field)?,
        }))
    }

    fn diagnostic(&mut self) -> FieldResult<DiagnosticFields> {
        Ok(DiagnosticFields {
            subcategory: self.r.opt_str("subcategory")?,
            code: self.r.opt_str("code")?,
            file: self.r.opt_str("file")?,
            project_file: self.r.opt_str("project_file")?,
            line_number: self.r.i32("line_number")?,
            column_number: self.r.i32("column_number")?,
            end_line_number: self.r.i32("end_line_number")?,
            end_column_number: self.r.i32("end_column_number")?,
        })
    }

    fn diagnostic_event(&mut self) -> FieldResult<DiagnosticEvent> {
        Ok(DiagnosticEvent {
            fields: self.fields()?,
            diagnostic: self.diagnostic()?,
        })
    }

    fn message_event(&mut self) -> FieldResult<MessageEvent> {
        Ok(MessageEvent {
            fields: self.fields()?,
            diagnostic: self.diagnostic()?,
            importance: self.r.enum_value("importance")?,
        })
    }

    fn extended(&mut self) -> FieldResult<ExtendedData> {
        Ok(ExtendedData {
            extended_type: self.r.str("extended_type")?,
            metadata: self.r.opt_metadata("extended_metadata")?,
            data: self.r.opt_str("extended_data")?,
        })
    }

    fn target_skipped(&mut self) -> FieldResult<TargetSkipped> {
        let mut event = TargetSkipped {
            fields: self.fields()?,
            target_name: self.r.opt_str("target_name")?,
            project_file: self.r.opt_str("project_file")?,
            target_file: self.r.opt_str("target_file")?,
            parent_target: self.r.opt_str("parent_target")?,
            build_reason: self.r.enum_value("build_reason")?,
            ..TargetSkipped::default()
        };
        if self.version.supports(FormatVersion::TARGET_SKIPPED_DETAILS) {
            event.condition = self.r.opt_str("condition")?;
            event.evaluated_condition = self.r.opt_str("evaluated_condition")?;
            event.originally_succeeded = self.r.bool("originally_succeeded")?;
            event.skip_reason = self.r.enum_value("skip_reason")?;
            event.original_context = self.opt_context("original_context")?;
        }
        Ok(event)
    }

    fn task_started(&mut self) -> FieldResult<TaskStarted> {
        let mut event = TaskStarted {
            fields: self.fields()?,
            task_name: self.r.opt_str("task_name")?,
            project_file: self.r.opt_str("project_file")?,
            task_file: self.r.opt_str("task_file")?,
            ..TaskStarted::default()
        };
        if self.version.supports(FormatVersion::TASK_LOCATION) {
            event.line_number = self.r.i32("line_number")?;
            event.column_number = self.r.i32("column_number")?;
        }
        if self.version.supports(FormatVersion::TASK_ASSEMBLY_LOCATION) {
            event.task_assembly_location = self.r.opt_str("task_assembly_location")?;
        }
        Ok(event)
    }

    fn task_items(&mut self, field: &'static str) -> FieldResult<Vec<TaskItem>> {
        let count = self.r.count(field)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(TaskItem {
                item_spec: self.r.str("item_spec")?,
                metadata: self.r.metadata("item_metadata")?,
            });
        }
        Ok(items)
    }

    fn item_groups(&mut self) -> FieldResult<Vec<ItemGroup>> {
        let count = self.r.count("items")?;
        let mut groups = Vec::with_capacity(count);
        for _ in 0..count {
            groups.push(ItemGroup {
                item_type: self.r.str("item_type")?,
                items: self.task_items("items")?,
            });
        }
        Ok(groups)
    }
}
