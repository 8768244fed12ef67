//! Shared fixtures for the codec integration tests.
#![allow(dead_code)]

use binlog_codec::{
    BinaryLogReader, EventEncoder, FormatVersion, PayloadBuffer, RecordHeader,
    RecoverableReadError, WriterConfig, BinaryLogWriter,
};
use binlog_types::*;
use bytes::BytesMut;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Terminator record.
pub const END_OF_FILE: [u8; 2] = [0, 0];

pub fn context() -> BuildEventContext {
    BuildEventContext::new(1, 2, 3, 4, 5, 6).with_evaluation_id(7)
}

pub fn metadata(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn fields(message: &str) -> EventFields {
    EventFields {
        message: Some(message.to_string()),
        help_keyword: None,
        sender_name: Some("MSBuild".to_string()),
        timestamp: Timestamp::from_ticks(638_500_000_000_000_000),
        context: Some(context()),
        thread_id: 3,
    }
}

pub fn diagnostic() -> DiagnosticFields {
    DiagnosticFields {
        subcategory: Some(String::new()),
        code: Some("CS0168".to_string()),
        file: Some("src/Program.cs".to_string()),
        project_file: None,
        line_number: 12,
        column_number: 17,
        end_line_number: 0,
        end_column_number: -1,
    }
}

pub fn diagnostic_event(message: &str) -> DiagnosticEvent {
    DiagnosticEvent {
        fields: fields(message),
        diagnostic: diagnostic(),
    }
}

pub fn message_event(message: &str, importance: MessageImportance) -> MessageEvent {
    MessageEvent {
        fields: fields(message),
        diagnostic: diagnostic(),
        importance,
    }
}

pub fn extended(with_metadata: bool) -> ExtendedData {
    ExtendedData {
        extended_type: "Telemetry.Custom".to_string(),
        metadata: with_metadata.then(|| metadata(&[("b", "2"), ("a", ""), ("c", "three")])),
        data: if with_metadata { None } else { Some("{\"k\":1}".to_string()) },
    }
}

pub fn items() -> Vec<TaskItem> {
    vec![
        TaskItem::new("bin/App.dll").with_metadata("CopyLocal", "true"),
        TaskItem::new(""),
    ]
}

/// One event of every structured kind.
pub fn every_event() -> Vec<BuildEvent> {
    vec![
        BuildEvent::BuildStarted(BuildStarted {
            fields: fields("Build started."),
            environment: Some(metadata(&[("PATH", "/usr/bin"), ("HOME", "/root")])),
        }),
        BuildEvent::BuildFinished(BuildFinished {
            fields: fields("Build succeeded."),
            succeeded: true,
        }),
        BuildEvent::ProjectStarted(ProjectStarted {
            fields: fields("Project started."),
            project_id: 42,
            project_file: Some("App.csproj".to_string()),
            target_names: Some(String::new()),
            tools_version: None,
            parent_context: Some(BuildEventContext::INVALID),
            global_properties: Some(metadata(&[("Configuration", "Release")])),
            properties: None,
            items: vec![ItemGroup {
                item_type: "Compile".to_string(),
                items: items(),
            }],
        }),
        BuildEvent::ProjectFinished(ProjectFinished {
            fields: fields("Project finished."),
            project_file: Some("App.csproj".to_string()),
            succeeded: false,
        }),
        BuildEvent::TargetStarted(TargetStarted {
            fields: fields("Target started."),
            target_name: Some("CoreCompile".to_string()),
            project_file: Some("App.csproj".to_string()),
            target_file: Some("Microsoft.Common.targets".to_string()),
            parent_target: None,
            build_reason: TargetBuiltReason::DependsOn,
        }),
        BuildEvent::TargetFinished(TargetFinished {
            fields: fields("Target finished."),
            target_name: Some("CoreCompile".to_string()),
            project_file: Some("App.csproj".to_string()),
            target_file: None,
            succeeded: true,
            target_outputs: items(),
        }),
        BuildEvent::TaskStarted(TaskStarted {
            fields: fields("Task started."),
            task_name: Some("Csc".to_string()),
            project_file: Some("App.csproj".to_string()),
            task_file: Some("Microsoft.CSharp.targets".to_string()),
            line_number: 250,
            column_number: 5,
            task_assembly_location: Some("/sdk/Roslyn.dll".to_string()),
        }),
        BuildEvent::TaskFinished(TaskFinished {
            fields: fields("Task finished."),
            task_name: Some("Csc".to_string()),
            project_file: None,
            task_file: Some(String::new()),
            succeeded: true,
        }),
        BuildEvent::Error(diagnostic_event("error CS0103")),
        BuildEvent::Warning(diagnostic_event("warning CS0168")),
        BuildEvent::Message(message_event("Copying file", MessageImportance::Low)),
        BuildEvent::TaskCommandLine(TaskCommandLine {
            message: message_event("csc.exe /noconfig", MessageImportance::High),
            command_line: Some("csc.exe /noconfig".to_string()),
            task_name: Some("Csc".to_string()),
        }),
        BuildEvent::CriticalMessage(message_event("Critical", MessageImportance::High)),
        BuildEvent::ProjectEvaluationStarted(ProjectEvaluationStarted {
            fields: fields("Evaluation started."),
            project_file: Some("App.csproj".to_string()),
        }),
        BuildEvent::ProjectEvaluationFinished(ProjectEvaluationFinished {
            fields: fields("Evaluation finished."),
            project_file: Some("App.csproj".to_string()),
            global_properties: None,
            properties: Some(metadata(&[("OutputType", "Exe"), ("Empty", "")])),
            items: vec![
                ItemGroup {
                    item_type: "PackageReference".to_string(),
                    items: vec![TaskItem::new("Serilog").with_metadata("Version", "3.1.1")],
                },
                ItemGroup {
                    item_type: "None".to_string(),
                    items: Vec::new(),
                },
            ],
        }),
        BuildEvent::ProjectImported(ProjectImported {
            message: message_event("Importing", MessageImportance::Low),
            imported_project_file: Some("Directory.Build.props".to_string()),
            unexpanded_project: Some("$(MSBuildThisFileDirectory)Directory.Build.props".to_string()),
            import_ignored: false,
        }),
        BuildEvent::TargetSkipped(TargetSkipped {
            fields: fields("Target skipped."),
            target_name: Some("GenerateDocs".to_string()),
            project_file: Some("App.csproj".to_string()),
            target_file: Some("App.csproj".to_string()),
            parent_target: Some("Build".to_string()),
            build_reason: TargetBuiltReason::AfterTargets,
            condition: Some("'$(Docs)' == 'true'".to_string()),
            evaluated_condition: Some("'' == 'true'".to_string()),
            originally_succeeded: false,
            skip_reason: TargetSkipReason::ConditionWasFalse,
            original_context: Some(BuildEventContext::new(1, 2, 3, 4, 9, -1)),
        }),
        BuildEvent::PropertyReassignment(PropertyReassignment {
            message: message_event("Property reassignment", MessageImportance::Low),
            property_name: Some("OutputPath".to_string()),
            previous_value: Some("bin/".to_string()),
            new_value: Some("out/".to_string()),
            location: Some("App.csproj (12,5)".to_string()),
        }),
        BuildEvent::UninitializedPropertyRead(UninitializedPropertyRead {
            message: message_event("Read uninitialized", MessageImportance::Low),
            property_name: Some("Foo".to_string()),
        }),
        BuildEvent::EnvironmentVariableRead(EnvironmentVariableRead {
            message: message_event("Read environment", MessageImportance::Low),
            variable_name: Some("DOTNET_ROOT".to_string()),
        }),
        BuildEvent::PropertyInitialValueSet(PropertyInitialValueSet {
            message: message_event("Initial value", MessageImportance::Low),
            property_name: Some("Configuration".to_string()),
            property_value: Some("Debug".to_string()),
            property_source: Some("Xml".to_string()),
        }),
        BuildEvent::TaskParameter(TaskParameter {
            message: message_event("", MessageImportance::Low),
            kind: TaskParameterKind::TaskOutput,
            item_type: Some("FileWrites".to_string()),
            items: items(),
            parameter_name: Some("OutputAssembly".to_string()),
            property_name: None,
        }),
        BuildEvent::ResponseFileUsed(ResponseFileUsed {
            message: message_event("Response file", MessageImportance::Normal),
            response_file_path: Some("/src/build.rsp".to_string()),
        }),
        BuildEvent::AssemblyLoad(AssemblyLoad {
            fields: fields("Assembly loaded."),
            loading_context: AssemblyLoadContext::TaskRun,
            loading_initiator: Some("Csc".to_string()),
            assembly_name: Some("Roslyn, Version=4.0.0.0".to_string()),
            assembly_path: Some("/sdk/Roslyn.dll".to_string()),
            mvid: [0xAB; 16],
            app_domain_name: None,
        }),
        BuildEvent::BuildCheckMessage(message_event("Check message", MessageImportance::Normal)),
        BuildEvent::BuildCheckWarning(diagnostic_event("BC0101")),
        BuildEvent::BuildCheckError(diagnostic_event("BC0102")),
        BuildEvent::BuildCheckTracing(BuildCheckTracing {
            fields: fields("Check tracing."),
            tracing_data: BTreeMap::from([
                ("BC0101".to_string(), 1_500_000i64),
                ("BC0102".to_string(), -1),
            ]),
        }),
        BuildEvent::BuildCheckAcquisition(BuildCheckAcquisition {
            fields: fields("Check acquired."),
            acquisition_path: Some("/checks/Custom.dll".to_string()),
            project_path: Some("App.csproj".to_string()),
        }),
        BuildEvent::BuildSubmissionStarted(BuildSubmissionStarted {
            fields: fields("Submission started."),
            submission_id: 0,
            entry_project_paths: vec!["App.sln".to_string()],
            target_names: vec!["Restore".to_string(), "Build".to_string()],
            global_properties: metadata(&[("Configuration", "Release")]),
            flags: 0x24,
        }),
        BuildEvent::BuildCanceled(BuildCanceled {
            fields: fields("Build canceled."),
        }),
        BuildEvent::ExtendedError(ExtendedDiagnostic {
            base: diagnostic_event("custom error"),
            extended: extended(true),
        }),
        BuildEvent::ExtendedWarning(ExtendedDiagnostic {
            base: diagnostic_event("custom warning"),
            extended: extended(false),
        }),
        BuildEvent::ExtendedMessage(ExtendedMessage {
            base: message_event("custom message", MessageImportance::Normal),
            extended: extended(true),
        }),
        BuildEvent::ExtendedCriticalMessage(ExtendedMessage {
            base: message_event("custom critical", MessageImportance::High),
            extended: ExtendedData {
                extended_type: String::new(),
                metadata: Some(Metadata::new()),
                data: Some(String::new()),
            },
        }),
        BuildEvent::ExtendedCustom(ExtendedCustom {
            fields: EventFields::default(),
            extended: ExtendedData::default(),
        }),
    ]
}

/// Payload bytes of one event at the current version.
pub fn payload_of(event: &BuildEvent) -> Vec<u8> {
    payload_at(event, FormatVersion::CURRENT)
}

pub fn payload_at(event: &BuildEvent, version: FormatVersion) -> Vec<u8> {
    let mut buf = PayloadBuffer::new();
    EventEncoder::new(&mut buf, version).encode(event);
    buf.as_ref().to_vec()
}

/// One framed record.
pub fn frame(ordinal: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = BytesMut::new();
    RecordHeader::new(ordinal, payload.len() as u32).encode_into(&mut out);
    out.extend_from_slice(payload);
    out.to_vec()
}

/// Headerless log of `events` at the current version, terminator included.
pub fn write_log(events: &[BuildEvent]) -> Vec<u8> {
    let config = WriterConfig::default().with_log_all_environment_variables(true);
    let mut writer = BinaryLogWriter::new(Vec::new(), config).unwrap();
    for event in events {
        writer.write(event).unwrap();
    }
    writer.finish().unwrap()
}

/// Route a reader's recoverable errors into a shared list.
pub fn collect_errors<R: std::io::Read>(
    reader: &mut BinaryLogReader<'_, R>,
) -> Arc<Mutex<Vec<RecoverableReadError>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    reader.on_recoverable_error(move |e| sink.lock().unwrap().push(e.clone()));
    seen
}

/// Opt-in log output: `RUST_LOG=binlog_codec=debug cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
