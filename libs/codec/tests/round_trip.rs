//! Write-then-read behaviour over every record kind.

mod common;

use binlog_codec::{
    BinaryLogReader, BinaryLogWriter, FormatVersion, LogRecord, ReadError, ReaderConfig,
    StreamHeader, WriteError, WriterConfig,
};
use binlog_types::*;
use common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn read_all(bytes: &[u8], version: FormatVersion) -> Vec<LogRecord> {
    let mut reader = BinaryLogReader::with_version(bytes, version, ReaderConfig::strict()).unwrap();
    let records: Vec<LogRecord> = reader.records().map(Result::unwrap).collect();
    assert!(reader.is_finished());
    assert_eq!(reader.position(), bytes.len() as u64);
    records
}

#[test]
fn test_fixture_covers_every_structured_kind() {
    let covered: BTreeSet<u32> = every_event().iter().map(|e| e.kind().ordinal()).collect();
    let expected: BTreeSet<u32> = EventKind::ALL
        .iter()
        .filter(|k| **k != EventKind::EndOfFile && !k.is_blob())
        .map(|k| k.ordinal())
        .collect();
    assert_eq!(covered, expected);
}

#[test]
fn test_every_kind_round_trips() {
    init_tracing();
    let events = every_event();
    let bytes = write_log(&events);
    let records = read_all(&bytes, FormatVersion::CURRENT);

    assert_eq!(records.len(), events.len());
    for (record, event) in records.iter().zip(&events) {
        assert_eq!(record.as_event(), Some(event), "{}", event.kind());
    }
}

#[test]
fn test_every_kind_round_trips_alone() {
    for event in every_event() {
        let bytes = write_log(std::slice::from_ref(&event));
        let records = read_all(&bytes, FormatVersion::CURRENT);
        assert_eq!(records, vec![LogRecord::Event(event)]);
    }
}

#[test]
fn test_absent_and_empty_strings_stay_distinct() {
    let mut absent = fields("x");
    absent.message = None;
    absent.help_keyword = None;
    let mut empty = fields("x");
    empty.message = Some(String::new());
    empty.help_keyword = Some(String::new());

    let events = vec![
        BuildEvent::BuildCanceled(BuildCanceled { fields: absent }),
        BuildEvent::BuildCanceled(BuildCanceled { fields: empty }),
    ];
    let records = read_all(&write_log(&events), FormatVersion::CURRENT);
    let decoded: Vec<_> = records.into_iter().filter_map(LogRecord::into_event).collect();

    assert_eq!(decoded[0].message(), None);
    assert_eq!(decoded[0].fields().help_keyword, None);
    assert_eq!(decoded[1].message(), Some(""));
    assert_eq!(decoded[1].fields().help_keyword.as_deref(), Some(""));
}

#[test]
fn test_context_presence_and_values() {
    let with_context = BuildEvent::BuildCanceled(BuildCanceled { fields: fields("a") });
    let without_context = BuildEvent::BuildCanceled(BuildCanceled {
        fields: EventFields::with_message("b"),
    });
    let records = read_all(
        &write_log(&[with_context, without_context]),
        FormatVersion::CURRENT,
    );
    assert_eq!(records[0].as_event().unwrap().context(), Some(&context()));
    assert_eq!(records[1].as_event().unwrap().context(), None);
}

#[test]
fn test_extended_metadata_presence_survives() {
    for metadata in [None, Some(Metadata::new()), Some(common::metadata(&[("k", "v")]))] {
        for data in [None, Some(String::new()), Some("payload".to_string())] {
            let event = BuildEvent::ExtendedCustom(ExtendedCustom {
                fields: EventFields::default(),
                extended: ExtendedData {
                    extended_type: "T".to_string(),
                    metadata: metadata.clone(),
                    data: data.clone(),
                },
            });
            let records = read_all(&write_log(std::slice::from_ref(&event)), FormatVersion::CURRENT);
            let decoded = records[0].as_event().unwrap().extended_data().unwrap();
            assert_eq!(decoded.metadata, metadata);
            assert_eq!(decoded.data, data);
        }
    }
}

#[test]
fn test_stream_header_round_trip() {
    let events = every_event();
    let mut writer = BinaryLogWriter::create(Vec::new(), WriterConfig::default()).unwrap();
    for event in &events {
        writer.write(event).unwrap();
    }
    let bytes = writer.finish().unwrap();

    let mut reader = BinaryLogReader::open(&bytes[..], ReaderConfig::strict()).unwrap();
    assert_eq!(reader.format_version(), FormatVersion::CURRENT);
    assert_eq!(reader.position(), StreamHeader::SIZE as u64);
    let decoded: Vec<BuildEvent> = reader
        .records()
        .map(|r| r.unwrap().into_event().unwrap())
        .collect();
    assert_eq!(decoded.len(), events.len());
    // Environment is not logged by default.
    let BuildEvent::BuildStarted(started) = &decoded[0] else {
        panic!("expected BuildStarted, got {:?}", decoded[0]);
    };
    assert_eq!(started.environment, None);
    assert_eq!(&decoded[1..], &events[1..]);
}

#[test]
fn test_environment_logged_when_enabled() {
    let event = every_event().remove(0);
    for (enabled, expected) in [(false, None), (true, Some(metadata(&[("PATH", "/usr/bin"), ("HOME", "/root")])))] {
        let config = WriterConfig::default().with_log_all_environment_variables(enabled);
        let mut writer = BinaryLogWriter::new(Vec::new(), config).unwrap();
        writer.write(&event).unwrap();
        let bytes = writer.finish().unwrap();

        let records = read_all(&bytes, FormatVersion::CURRENT);
        let Some(BuildEvent::BuildStarted(started)) = records[0].as_event() else {
            panic!("expected BuildStarted");
        };
        assert_eq!(started.environment, expected);
    }
}

#[test]
fn test_old_version_stream_defaults_gated_fields() {
    let version = FormatVersion::new(13);
    let config = WriterConfig::default().with_format_version(version);
    let mut writer = BinaryLogWriter::create(Vec::new(), config).unwrap();

    let mut written = Vec::new();
    for event in every_event() {
        match writer.write(&event) {
            Ok(()) => written.push(event),
            Err(WriteError::KindNotSupported { required, .. }) => assert!(required > 13),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    let bytes = writer.finish().unwrap();
    assert!(written.iter().all(|e| version.supports_kind(e.kind())));

    let mut reader = BinaryLogReader::open(&bytes[..], ReaderConfig::strict()).unwrap();
    assert_eq!(reader.format_version(), version);
    for expected in &written {
        let decoded = reader.read().unwrap().unwrap().into_event().unwrap();
        match (expected, &decoded) {
            (BuildEvent::TargetSkipped(expected), BuildEvent::TargetSkipped(decoded)) => {
                assert_eq!(decoded.target_name, expected.target_name);
                assert_eq!(decoded.condition, None);
                assert_eq!(decoded.original_context, None);
                assert_eq!(decoded.skip_reason, TargetSkipReason::None);
            }
            (BuildEvent::TaskStarted(expected), BuildEvent::TaskStarted(decoded)) => {
                assert_eq!(decoded.line_number, expected.line_number);
                assert_eq!(decoded.task_assembly_location, None);
            }
            (BuildEvent::BuildStarted(_), BuildEvent::BuildStarted(decoded)) => {
                assert_eq!(decoded.environment, None);
            }
            _ => assert_eq!(&decoded, expected),
        }
    }
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn test_evaluation_id_gate() {
    let event = BuildEvent::BuildFinished(BuildFinished {
        fields: fields("v1"),
        succeeded: true,
    });
    let v1 = FormatVersion::new(1);
    let config = WriterConfig::default().with_format_version(v1);
    let mut writer = BinaryLogWriter::new(Vec::new(), config).unwrap();
    writer.write(&event).unwrap();
    let bytes = writer.finish().unwrap();

    let records = read_all(&bytes, v1);
    let decoded = records[0].as_event().unwrap().context().unwrap();
    assert_eq!(decoded.evaluation_id, BuildEventContext::INVALID_ID);
    assert_eq!(decoded.task_id, context().task_id);
    assert_eq!(decoded.project_instance_id, context().project_instance_id);

    // Only the evaluation id varint is missing from the old layout
    let evaluation_id_len = binlog_codec::varint::encoded_len(context().evaluation_id as u32 as u64);
    assert_eq!(
        payload_at(&event, v1).len() + evaluation_id_len,
        payload_at(&event, FormatVersion::CURRENT).len()
    );
}

#[test]
fn test_newer_stream_is_read_at_current_version() {
    let mut bytes = Vec::new();
    let mut header = bytes::BytesMut::new();
    StreamHeader {
        format_version: 25,
        minimum_reader_version: 18,
    }
    .encode_into(&mut header);
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(&write_log(&every_event()[..3]));

    let mut reader = BinaryLogReader::open(&bytes[..], ReaderConfig::lenient()).unwrap();
    assert_eq!(reader.format_version(), FormatVersion::CURRENT);
    assert_eq!(reader.records().count(), 3);
}

#[test]
fn test_stream_requiring_newer_reader_is_rejected() {
    let mut header = bytes::BytesMut::new();
    StreamHeader {
        format_version: 30,
        minimum_reader_version: 25,
    }
    .encode_into(&mut header);
    let err = BinaryLogReader::open(&header[..], ReaderConfig::lenient()).err().unwrap();
    assert!(matches!(
        err,
        ReadError::UnsupportedFormatVersion { version: 30, minimum_reader_version: 25, .. }
    ));
}

#[test]
fn test_missing_stream_header_is_end_of_stream() {
    let err = BinaryLogReader::open(&[20u8, 0, 0][..], ReaderConfig::lenient()).err().unwrap();
    assert!(err.is_end_of_stream());
}

fn write_blob_log(data: &[u8]) -> Vec<u8> {
    let mut writer = BinaryLogWriter::new(Vec::new(), WriterConfig::default()).unwrap();
    writer.write_blob(EventKind::ProjectImportArchive, data).unwrap();
    writer
        .write(&BuildEvent::BuildFinished(BuildFinished::default()))
        .unwrap();
    writer.finish().unwrap()
}

#[test]
fn test_empty_blob_round_trips() {
    let records = read_all(&write_blob_log(&[]), FormatVersion::CURRENT);
    let blob = records[0].as_blob().unwrap();
    assert_eq!(blob.kind, EventKind::ProjectImportArchive);
    assert!(blob.data.is_empty());
    assert_eq!(records[1].kind(), EventKind::BuildFinished);
}

proptest! {
    #[test]
    fn prop_blob_bytes_come_back_unchanged(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let records = read_all(&write_blob_log(&data), FormatVersion::CURRENT);
        prop_assert_eq!(records.len(), 2);
        let blob = records[0].as_blob().unwrap();
        prop_assert_eq!(&blob.data[..], &data[..]);
    }

    #[test]
    fn prop_arbitrary_strings_round_trip(
        message in proptest::option::of(".*"),
        sender in proptest::option::of("[a-zA-Z0-9 ]{0,64}"),
        thread_id in any::<i32>(),
        ticks in any::<i64>(),
    ) {
        let event = BuildEvent::BuildCanceled(BuildCanceled {
            fields: EventFields {
                message,
                help_keyword: None,
                sender_name: sender,
                timestamp: Timestamp::from_ticks(ticks),
                context: None,
                thread_id,
            },
        });
        let records = read_all(&write_log(std::slice::from_ref(&event)), FormatVersion::CURRENT);
        prop_assert_eq!(records, vec![LogRecord::Event(event)]);
    }
}
