use anyhow::Result;
use sidewalk_kml::{geo::KmlWriter, run, Config};
use std::{fs, path::Path};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sidewalk_kml=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn log_line(seq: u32, payload: &str, ts: &str) -> String {
    format!(
        "2024-06-04 17:39:{seq:02},\"{{MessageId:msg-{seq},WirelessDeviceId:dev-1,PayloadData:{payload},\
         WirelessMetadata:{{Sidewalk:{{CmdExStatus:COMMAND_EXEC_SUCCESS,MessageType:CUSTOM_COMMAND_ID_NOTIFY,\
         NackExStatus:[],Seq:{seq},SidewalkId:BFFFFFFFFF,Timestamp:{ts}}}}}}}\",sidewalk-rule\n"
    )
}

fn write_log(dir: &Path, lines: &[String]) -> Result<std::path::PathBuf> {
    let path = dir.join("aws_log.txt");
    fs::write(&path, lines.concat())?;
    Ok(path)
}

#[test]
fn converts_log_to_csv_and_kml() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let input = write_log(
        dir.path(),
        &[
            "MessageId,WirelessDeviceId,PayloadData\n".to_string(),
            // 01 47.609722 -122.333056
            log_line(1, "MDEwMkQ2Nzc3QUY4QjU1ODgw", "2024-06-04T17:39:01.000Z"),
            // 02 -33.86882 151.209296
            log_line(2, "MDJGREZCMzNFQzA5MDM0NTUw", "2024-06-04T17:39:02.000Z"),
            // 99 10.0 20.0
            log_line(3, "OTkwMDk4OTY4MDAxMzEyRDAw", "2024-06-04T17:39:03.000Z"),
            log_line(4, "!!!not-base64!!!", "2024-06-04T17:39:04.000Z"),
        ],
    )?;

    let summary = run(&input, &Config::default(), &KmlWriter)?;

    assert_eq!(summary.processed, dir.path().join("aws_log_processed.csv"));
    assert_eq!(summary.input_lines, 5);
    assert_eq!(summary.rows_written, 4);
    assert_eq!(summary.rows_skipped, 0);
    assert_eq!(summary.decode_failures, 1);
    // the malformed row has empty coordinates and a content code of ""
    assert_eq!(summary.geo_rows_skipped, 0);
    assert_eq!(summary.groups["01"], 1);
    assert_eq!(summary.groups["02"], 1);
    assert_eq!(summary.groups["03"], 0);

    let csv = fs::read_to_string(&summary.processed)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date/Time,MessageId:,WirelessDeviceId:,PayloadData:,Payload Content,Latitude,Longitude,\
         WirelessMetadata:,Msg Type:,Seq Number:,SidewalkId:,Timestamp:,Rule:"
    );
    assert_eq!(lines.len(), 5);
    assert!(!csv.contains("MessageId,WirelessDeviceId,PayloadData"));
    assert_eq!(
        lines[1],
        "2024-06-04 17:39:01,msg-1,dev-1,01 02 d6 77 7a f8 b5 58 80,01,47.609722,-122.333056,\
         COMMAND_EXEC_SUCCESS,CUSTOM_COMMAND_ID_NOTIFY,Seq:1,BFFFFFFFFF,2024-06-04T17:39:01.000Z,sidewalk-rule"
    );
    assert!(lines[4].starts_with("2024-06-04 17:39:04,msg-4,dev-1,!!!not-base64!!!,,,,"));

    let ble = dir.path().join("aws_log_processed_BLE.kml");
    let fsk = dir.path().join("aws_log_processed_FSK.kml");
    let css = dir.path().join("aws_log_processed_CSS.kml");
    assert_eq!(summary.geo_files, vec![ble.clone(), fsk.clone()]);
    assert!(!css.exists());

    let fsk_doc = fs::read_to_string(&fsk)?;
    assert!(fsk_doc.contains("<name>Payload Content 02 - FSK</name>"));
    assert!(fsk_doc.contains("<coordinates>151.209296,-33.86882,0</coordinates>"));
    assert!(fsk_doc.contains("<when>2024-06-04T17:39:02Z</when>"));
    assert_eq!(fsk_doc.matches("<Placemark>").count(), 1);

    let ble_doc = fs::read_to_string(&ble)?;
    assert!(ble_doc.contains("<coordinates>-122.333056,47.609722,0</coordinates>"));
    Ok(())
}

#[test]
fn header_only_log_writes_header_and_no_kml() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let input = write_log(
        dir.path(),
        &["Date,MessageId,WirelessDeviceId,PayloadData,WirelessMetadata,Type,Nack,Seq,SidewalkId,Timestamp,Rule\n"
            .to_string()],
    )?;

    let summary = run(&input, &Config::default(), &KmlWriter)?;

    assert_eq!(summary.rows_written, 0);
    assert!(summary.geo_files.is_empty());
    assert!(summary.groups.values().all(|&n| n == 0));

    let csv = fs::read_to_string(&summary.processed)?;
    assert_eq!(
        csv,
        "Date/Time,MessageId:,WirelessDeviceId:,PayloadData:,Payload Content,Latitude,Longitude,\
         WirelessMetadata:,Msg Type:,Seq Number:,SidewalkId:,Timestamp:,Rule:\n"
    );
    let kml_files = fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("kml"))
        .count();
    assert_eq!(kml_files, 0);
    Ok(())
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = run(&dir.path().join("nope.csv"), &Config::default(), &KmlWriter);
    assert!(result.is_err());
}
