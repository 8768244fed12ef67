//! Throughput of the write and read paths
//!
//! A build log is dominated by message, task and target records; the mix
//! below approximates that. The lenient read bench adds unknown records so
//! the skip path is measured alongside decoding.

use binlog_codec::{BinaryLogReader, BinaryLogWriter, FormatVersion, RawRecord, ReaderConfig, WriterConfig};
use binlog_types::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

fn fields(message: &str, thread_id: i32) -> EventFields {
    EventFields {
        message: Some(message.to_string()),
        help_keyword: None,
        sender_name: Some("MSBuild".to_string()),
        timestamp: Timestamp::from_ticks(638_500_000_000_000_000 + i64::from(thread_id)),
        context: Some(BuildEventContext::new(1, 2, 3, 4, 5, thread_id)),
        thread_id,
    }
}

/// Create a representative event mix
fn build_events(count: usize) -> Vec<BuildEvent> {
    (0..count)
        .map(|i| {
            let n = i as i32;
            match i % 4 {
                0 => BuildEvent::Message(MessageEvent {
                    fields: fields("Copying file from obj/ to bin/", n),
                    diagnostic: DiagnosticFields::default(),
                    importance: MessageImportance::Low,
                }),
                1 => BuildEvent::TaskStarted(TaskStarted {
                    fields: fields("Task \"Copy\"", n),
                    task_name: Some("Copy".to_string()),
                    project_file: Some("src/App/App.csproj".to_string()),
                    task_file: Some("Microsoft.Common.targets".to_string()),
                    line_number: 4800,
                    column_number: 5,
                    task_assembly_location: None,
                }),
                2 => BuildEvent::TargetFinished(TargetFinished {
                    fields: fields("Done building target", n),
                    target_name: Some("CopyFilesToOutputDirectory".to_string()),
                    project_file: Some("src/App/App.csproj".to_string()),
                    target_file: None,
                    succeeded: true,
                    target_outputs: vec![TaskItem::new("bin/App.dll").with_metadata("CopyLocal", "true")],
                }),
                _ => BuildEvent::Warning(DiagnosticEvent {
                    fields: fields("The variable 'e' is declared but never used", n),
                    diagnostic: DiagnosticFields {
                        code: Some("CS0168".to_string()),
                        file: Some("src/App/Program.cs".to_string()),
                        line_number: 12,
                        column_number: 17,
                        ..DiagnosticFields::default()
                    },
                }),
            }
        })
        .collect()
}

fn write_stream(events: &[BuildEvent]) -> Vec<u8> {
    let mut writer = BinaryLogWriter::create(Vec::new(), WriterConfig::default()).unwrap();
    for event in events {
        writer.write(event).unwrap();
    }
    writer.finish().unwrap()
}

fn bench_write(c: &mut Criterion) {
    let events = build_events(10_000);
    let bytes = write_stream(&events);

    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("mixed_events", |b| {
        b.iter(|| black_box(write_stream(black_box(&events))));
    });
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let events = build_events(10_000);
    let bytes = write_stream(&events);

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("strict_decode", |b| {
        b.iter(|| {
            let mut reader = BinaryLogReader::open(black_box(&bytes[..]), ReaderConfig::strict()).unwrap();
            let mut count = 0usize;
            while let Some(record) = reader.read().unwrap() {
                black_box(record);
                count += 1;
            }
            assert_eq!(count, events.len());
        });
    });

    group.bench_function("raw_records", |b| {
        b.iter(|| {
            let mut reader = BinaryLogReader::open(black_box(&bytes[..]), ReaderConfig::strict()).unwrap();
            while let Some(record) = reader.read_raw().unwrap() {
                black_box(record);
            }
        });
    });

    group.finish();
}

fn bench_lenient_skip(c: &mut Criterion) {
    // Every other record has a kind this reader has never heard of
    let events = build_events(5_000);
    let mut writer = BinaryLogWriter::new(Vec::new(), WriterConfig::default()).unwrap();
    let unknown = RawRecord::with_ordinal(250, vec![0x5Au8; 96]);
    for event in &events {
        writer.write(event).unwrap();
        writer.write_raw(&unknown).unwrap();
    }
    let bytes = writer.finish().unwrap();

    c.bench_function("read/lenient_skip_unknown", |b| {
        b.iter_batched(
            ReaderConfig::lenient,
            |config| {
                let mut reader =
                    BinaryLogReader::with_version(&bytes[..], FormatVersion::CURRENT, config).unwrap();
                reader.on_recoverable_error(|e| {
                    black_box(e);
                });
                let records = reader.records().filter(|r| r.is_ok()).count();
                assert_eq!(records, events.len());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_write, bench_read, bench_lenient_skip);
criterion_main!(benches);
