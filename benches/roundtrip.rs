use criterion::{Criterion, criterion_group, criterion_main};
use s7k::{Event, Reader, RecordKind, RecordType, Store, Time7k, Writer};
use std::hint::black_box;
use std::io::Cursor;

fn ping_store(ping_number: u32, n_beams: u32) -> Store {
    let mut store = Store::new();
    store.time = Time7k {
        year: 2021,
        day: 150,
        hours: 10,
        minutes: 30,
        seconds: ping_number as f32,
    };
    store.kind = RecordKind::Ping;
    store.sonar_settings.ping_number = ping_number;
    store.ping_flags.set(RecordType::SonarSettings);
    store.raw_detection.ping_number = ping_number;
    store.raw_detection.n_beams = n_beams;
    store.raw_detection.data_field_size = 34;
    store.raw_detection.beams = (0..n_beams)
        .map(|i| s7k::records::RawDetectionBeam {
            beam_descriptor: i as u16,
            detection_point: 100. + i as f32,
            rx_angle: i as f32 * 0.005 - 0.7,
            quality: 3,
            ..Default::default()
        })
        .collect();
    store.ping_flags.set(RecordType::RawDetection);
    store
}

fn build_file(pings: u32, n_beams: u32) -> Vec<u8> {
    let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
    let mut header = Store::new();
    header.time = Time7k {
        year: 2021,
        day: 150,
        ..Default::default()
    };
    header.kind = RecordKind::Header;
    header.record_type = RecordType::FileHeader;
    writer.write(&header).unwrap();
    for ping_number in 0..pings {
        writer.write(&ping_store(ping_number, n_beams)).unwrap();
    }
    writer.into_inner().unwrap().into_inner()
}

fn roundtrip(c: &mut Criterion) {
    let bytes = build_file(32, 256);

    c.bench_function("write 32 pings", |b| {
        b.iter(|| black_box(build_file(32, 256)));
    });

    c.bench_function("read 32 pings", |b| {
        b.iter(|| {
            let mut reader = Reader::new(Cursor::new(bytes.clone())).unwrap();
            let mut pings = 0;
            while let Some(event) = reader.read_next().unwrap() {
                if event == Event::Ping {
                    pings += 1;
                }
            }
            black_box(pings)
        });
    });
}

criterion_group!(benches, roundtrip);
criterion_main!(benches);
