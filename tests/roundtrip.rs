//! Write files, read them back, and check the logical record sequence.

use s7k::records::SystemEventMessage;
use s7k::{Event, Reader, RecordKind, RecordType, Store, Time7k, Writer};
use std::io::Cursor;

fn time(seconds: f32) -> Time7k {
    Time7k {
        year: 2021,
        day: 150,
        hours: 10,
        minutes: 30,
        seconds,
    }
}

fn header_store(time: Time7k) -> Store {
    let mut store = Store::new();
    store.time = time;
    store.kind = RecordKind::Header;
    store.record_type = RecordType::FileHeader;
    store
}

fn ping_store(ping_number: u32, n_beams: u32, time: Time7k) -> Store {
    let mut store = Store::new();
    store.time = time;
    store.kind = RecordKind::Ping;
    store.device_id = 7125;

    store.sonar_settings.sonar_id = 7125;
    store.sonar_settings.ping_number = ping_number;
    store.sonar_settings.frequency = 400_000.;
    store.sonar_settings.sample_rate = 34_483.;
    store.ping_flags.set(RecordType::SonarSettings);

    store.beam_geometry.sonar_id = 7125;
    store.beam_geometry.n_beams = n_beams;
    store.beam_geometry.angle_vertical = vec![0.; n_beams as usize];
    store.beam_geometry.angle_horizontal = (0..n_beams)
        .map(|i| i as f32 * 0.01 - 0.7)
        .collect();
    store.beam_geometry.beamwidth_vertical = vec![0.017; n_beams as usize];
    store.beam_geometry.beamwidth_horizontal = vec![0.017; n_beams as usize];
    store.ping_flags.set(RecordType::BeamGeometry);

    store.raw_detection.sonar_id = 7125;
    store.raw_detection.ping_number = ping_number;
    store.raw_detection.n_beams = n_beams;
    store.raw_detection.data_field_size = 34;
    store.raw_detection.sampling_rate = 34_483.;
    store.raw_detection.beams = (0..n_beams)
        .map(|i| s7k::records::RawDetectionBeam {
            beam_descriptor: i as u16,
            detection_point: 100. + i as f32,
            rx_angle: i as f32 * 0.01 - 0.7,
            flags: 1,
            quality: 3,
            ..Default::default()
        })
        .collect();
    store.ping_flags.set(RecordType::RawDetection);

    store
}

/// Walks the raw bytes of a file, checking the framing invariants: sync
/// pattern, declared size, and checksum of every record.
fn walk_records(bytes: &[u8]) -> Vec<(u32, usize)> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let sync = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().unwrap());
        assert_eq!(0x0000_FFFF, sync, "sync at offset {pos}");
        let size = u32::from_le_bytes(bytes[pos + 8..pos + 12].try_into().unwrap()) as usize;
        let record_type = u32::from_le_bytes(bytes[pos + 32..pos + 36].try_into().unwrap());
        let computed = bytes[pos..pos + size - 4]
            .iter()
            .fold(0u32, |sum, &byte| sum.wrapping_add(u32::from(byte)));
        let declared = u32::from_le_bytes(bytes[pos + size - 4..pos + size].try_into().unwrap());
        assert_eq!(computed, declared, "checksum for record type {record_type}");
        records.push((record_type, size));
        pos += size;
    }
    assert_eq!(bytes.len(), pos, "file ends mid-record");
    records
}

fn write_file<F: FnOnce(&mut Writer<Cursor<Vec<u8>>>)>(build: F) -> Vec<u8> {
    let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
    build(&mut writer);
    writer.into_inner().unwrap().into_inner()
}

#[test]
fn minimal_file() {
    let bytes = write_file(|writer| {
        writer.write(&header_store(time(0.))).unwrap();
    });

    // a file header followed by a one-entry catalog
    let records = walk_records(&bytes);
    assert_eq!(2, records.len());
    assert_eq!(RecordType::FileHeader as u32, records[0].0);
    assert_eq!(RecordType::FileCatalog as u32, records[1].0);
    let catalog_size = records[1].1;

    let mut reader = Reader::new(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );
    let file_header = &reader.store().file_header;
    assert!(file_header.optional_data);
    assert_eq!(catalog_size as u32, file_header.catalog_size);
    assert_eq!((bytes.len() - catalog_size) as u64, file_header.catalog_offset);
    assert_eq!(None, reader.read_next().unwrap());

    let catalog = reader.catalog().unwrap();
    assert_eq!(1, catalog.entries.len());
    assert_eq!(0, catalog.entries[0].offset);
    assert_eq!(RecordType::FileHeader as u16, catalog.entries[0].record_type);
}

#[test]
fn one_ping() {
    let written = ping_store(42, 32, time(1.));
    let bytes = write_file(|writer| {
        writer.write(&header_store(time(0.))).unwrap();
        writer.write(&written).unwrap();
    });

    let records: Vec<u32> = walk_records(&bytes).iter().map(|r| r.0).collect();
    assert_eq!(
        vec![
            RecordType::FileHeader as u32,
            RecordType::SonarSettings as u32,
            RecordType::BeamGeometry as u32,
            RecordType::RawDetection as u32,
            RecordType::FileCatalog as u32,
        ],
        records
    );

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );
    assert_eq!(Some(Event::Ping), reader.read_next().unwrap());
    let store = reader.store();
    assert!(store.ping_flags.sonar_settings);
    assert!(store.ping_flags.beam_geometry);
    assert!(store.ping_flags.raw_detection);
    assert!(!store.ping_flags.side_scan);
    assert_eq!(42, store.sonar_settings.ping_number);
    assert_eq!(42, store.raw_detection.ping_number);
    assert_eq!(32, store.raw_detection.beams.len());
    assert_eq!(written.sonar_settings, store.sonar_settings);
    assert_eq!(written.beam_geometry, store.beam_geometry);
    assert_eq!(written.raw_detection, store.raw_detection);
    assert_eq!(None, reader.read_next().unwrap());
    assert_eq!(0, reader.skipped_bytes());
    assert_eq!(0, reader.checksum_mismatches());
}

#[test]
fn comments_before_header() {
    let bytes = write_file(|writer| {
        for text in ["a", "b", "c"] {
            let mut store = Store::new();
            store.time = time(0.);
            store.kind = RecordKind::Comment;
            store.record_type = RecordType::SystemEventMessage;
            store.system_event_message = SystemEventMessage::new(text);
            writer.write(&store).unwrap();
        }
        writer.write(&header_store(time(0.))).unwrap();
    });

    // the header leads on disk even though the comments came first
    let records: Vec<u32> = walk_records(&bytes).iter().map(|r| r.0).collect();
    assert_eq!(RecordType::FileHeader as u32, records[0]);

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );
    for text in ["a", "b", "c"] {
        assert_eq!(
            Some(Event::Aux(RecordKind::Comment)),
            reader.read_next().unwrap()
        );
        assert_eq!(text, reader.store().system_event_message.message);
    }
    assert_eq!(None, reader.read_next().unwrap());
}

#[test]
fn pre_catalog_ordering() {
    // interleave two pings' records out of canonical order on disk
    let bytes = write_file(|writer| {
        writer.write(&header_store(time(0.))).unwrap();
        let mut single = |record_type: RecordType, ping_number: u32, t: Time7k| {
            let mut store = ping_store(ping_number, 4, t);
            store.kind = RecordKind::Parameter;
            store.record_type = record_type;
            store.bathymetry.ping_number = ping_number;
            store.bathymetry.n_beams = 0;
            writer.write(&store).unwrap();
        };
        single(RecordType::SonarSettings, 10, time(1.));
        single(RecordType::SonarSettings, 11, time(2.));
        single(RecordType::Bathymetry, 10, time(1.));
        single(RecordType::RawDetection, 10, time(1.));
        single(RecordType::RawDetection, 11, time(2.));
    });

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );

    assert_eq!(Some(Event::Ping), reader.read_next().unwrap());
    let store = reader.store();
    assert_eq!(10, store.sonar_settings.ping_number);
    assert_eq!(10, store.bathymetry.ping_number);
    assert!(store.ping_flags.sonar_settings);
    assert!(store.ping_flags.bathymetry);
    assert!(store.ping_flags.raw_detection);

    assert_eq!(Some(Event::Ping), reader.read_next().unwrap());
    let store = reader.store();
    assert_eq!(11, store.sonar_settings.ping_number);
    assert!(!store.ping_flags.bathymetry);

    assert_eq!(None, reader.read_next().unwrap());
}

#[test]
fn aux_records_roundtrip_and_feed() {
    let mut nav = Store::new();
    nav.time = time(5.);
    nav.kind = RecordKind::Nav;
    nav.record_type = RecordType::Navigation;
    nav.navigation.latitude = 0.83;
    nav.navigation.longitude = -2.15;
    nav.navigation.speed = 2.5;
    nav.navigation.heading = 1.2;

    let mut svp = Store::new();
    svp.time = time(6.);
    svp.kind = RecordKind::SoundVelocity;
    svp.record_type = RecordType::SoundVelocityProfile;
    svp.sound_velocity_profile.n = 2;
    svp.sound_velocity_profile.depths = vec![0., 50.];
    svp.sound_velocity_profile.sound_velocities = vec![1500., 1487.];

    let bytes = write_file(|writer| {
        writer.write(&header_store(time(0.))).unwrap();
        writer.write(&nav).unwrap();
        writer.write(&svp).unwrap();
    });

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );
    assert_eq!(
        Some(Event::Aux(RecordKind::Nav)),
        reader.read_next().unwrap()
    );
    assert_eq!(nav.navigation, reader.store().navigation);
    assert_eq!(
        Some(Event::Aux(RecordKind::SoundVelocity)),
        reader.read_next().unwrap()
    );
    assert_eq!(svp.sound_velocity_profile, reader.store().sound_velocity_profile);
    assert_eq!(None, reader.read_next().unwrap());

    let feed = reader.feeds().nav.samples();
    assert_eq!(1, feed.len());
    assert!((feed[0].latitude - 0.83).abs() < 1e-9);
    assert_eq!(1, reader.feeds().heading.samples().len());
}

#[test]
fn incomplete_ping_is_never_emitted() {
    // sonar settings but no detection record at all
    let bytes = write_file(|writer| {
        writer.write(&header_store(time(0.))).unwrap();
        let mut store = ping_store(42, 4, time(1.));
        store.ping_flags.raw_detection = false;
        writer.write(&store).unwrap();
    });

    let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(
        Some(Event::Aux(RecordKind::Header)),
        reader.read_next().unwrap()
    );
    assert_eq!(None, reader.read_next().unwrap());
}
