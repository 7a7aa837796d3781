//! End-to-end batch transformation tests against the DynamoDB stream decoder.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ddbhistory_batch::{
    BatchTransformer, SummaryReporter, TransformationEvent, TransformationResponse,
    TransformerConfig,
};
use ddbhistory_core::record::{InputRecord, OutputRecord, RecordStatus};
use ddbhistory_dynamodb::DynamoStreamDecoder;
use serde_json::json;
use std::sync::Arc;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn transformer() -> BatchTransformer {
    BatchTransformer::new(Arc::new(DynamoStreamDecoder::new()))
}

fn parallel_transformer() -> BatchTransformer {
    let config = TransformerConfig::default().parallel_threshold(1).chunk_size(4);
    BatchTransformer::with_config(Arc::new(DynamoStreamDecoder::new()), config).unwrap()
}

fn modify_envelope(product: &str) -> serde_json::Value {
    json!({
        "awsRegion": "ap-northeast-1",
        "dynamodb": {
            "ApproximateCreationDateTime": 1613022644643i64,
            "Keys": {"k1": {"S": "cea899cd-edd5-44f0-aca8-f2ab0e52f5b9"}},
            "NewImage": {
                "product": {"S": format!("{product} aaaa")},
                "active": {"BOOL": false}
            },
            "OldImage": {
                "product": {"S": product},
                "active": {"BOOL": false}
            },
            "SizeBytes": 745
        },
        "eventID": "3bd669d8-0ff0-4af2-9bfb-8e32077068fc",
        "eventName": "MODIFY",
        "userIdentity": null,
        "recordFormat": "application/json",
        "tableName": "orders",
        "eventSource": "aws:dynamodb"
    })
}

fn encode(envelope: &serde_json::Value) -> String {
    STANDARD.encode(serde_json::to_vec(envelope).unwrap())
}

fn record(id: &str, envelope: &serde_json::Value) -> InputRecord {
    InputRecord::new(id, 1613022603017, encode(envelope))
}

/// base64 → strip trailing newline → JSON
fn decode_output(out: &OutputRecord) -> serde_json::Value {
    let bytes = STANDARD.decode(&out.payload).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let line = text.strip_suffix('\n').expect("missing trailing newline");
    serde_json::from_str(line).unwrap()
}

fn valid_batch(n: usize) -> Vec<InputRecord> {
    (0..n)
        .map(|i| record(&format!("rec-{i}"), &modify_envelope(&format!("Gloves {i}"))))
        .collect()
}

// ─── Order, cardinality, isolation ────────────────────────────────────────────

#[test]
fn order_and_cardinality() {
    for n in [0usize, 1, 2, 17, 130] {
        let input = valid_batch(n);
        for t in [transformer(), parallel_transformer()] {
            let out = t.transform(&input);
            assert_eq!(out.records.len(), n);
            for (i, (inp, outp)) in input.iter().zip(&out.records).enumerate() {
                assert_eq!(inp.record_id, outp.record_id, "position {i}");
                assert_eq!(outp.status, RecordStatus::Ok);
            }
        }
    }
}

#[test]
fn corrupt_record_is_isolated() {
    let mut input = valid_batch(5);
    input[2].payload = "%%%not-base64%%%".into();

    let out = transformer().transform(&input);
    let failed: Vec<_> = out.records.iter().filter(|r| !r.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].record_id, "rec-2");
    assert_eq!(out.records.iter().filter(|r| r.is_ok()).count(), 4);

    // valid outputs are byte-identical to transforming each record alone
    for (i, rec) in input.iter().enumerate() {
        if i == 2 {
            continue;
        }
        let alone = transformer().transform(std::slice::from_ref(rec));
        assert_eq!(alone.records[0], out.records[i]);
    }
}

#[test]
fn parallel_and_sequential_agree() {
    let mut input = valid_batch(40);
    input[7].payload = STANDARD.encode("{\"eventName\":\"INSERT\"}");
    input[31].payload = "AAAA====".into();

    let seq = BatchTransformer::with_config(
        Arc::new(DynamoStreamDecoder::new()),
        TransformerConfig::sequential(),
    )
    .unwrap()
    .transform(&input);
    let par = parallel_transformer().transform(&input);

    assert_eq!(seq.records, par.records);
    let seq_idx: Vec<usize> = seq.failures.iter().map(|(i, _)| *i).collect();
    let par_idx: Vec<usize> = par.failures.iter().map(|(i, _)| *i).collect();
    assert_eq!(seq_idx, vec![7, 31]);
    assert_eq!(seq_idx, par_idx);
}

// ─── Round trip, failure preservation, idempotence ────────────────────────────

#[test]
fn ok_output_round_trips_to_normalized_record() {
    let input = vec![record("rec-0", &modify_envelope("Gloves"))];
    let out = transformer().transform(&input);
    let doc = decode_output(&out.records[0]);
    assert_eq!(
        doc,
        json!({
            "recordId": "rec-0",
            "approximateArrivalTimestamp": 1613022603017i64,
            "eventID": "3bd669d8-0ff0-4af2-9bfb-8e32077068fc",
            "eventName": "MODIFY",
            "tableName": "orders",
            "ApproximateCreationDateTime": 1613022644643i64,
            "SizeBytes": 745,
            "NewImage": {"product": "Gloves aaaa", "active": false},
            "OldImage": {"product": "Gloves", "active": false}
        })
    );
}

#[test]
fn failure_preserves_input_payload() {
    let payloads = vec![
        "not base64 at all".to_string(),
        "////".to_string(),
        STANDARD.encode([0xc3, 0x28]),
        STANDARD.encode("{\"dynamodb\":"),
    ];
    let input: Vec<_> = payloads
        .into_iter()
        .enumerate()
        .map(|(i, p)| InputRecord::new(format!("bad-{i}"), 0, p))
        .collect();
    let out = transformer().transform(&input);
    for (inp, outp) in input.iter().zip(&out.records) {
        assert_eq!(outp.status, RecordStatus::ProcessingFailed);
        assert_eq!(outp.payload.as_bytes(), inp.payload.as_bytes());
    }
}

#[test]
fn transforming_twice_is_identical() {
    let mut input = valid_batch(10);
    input[4].payload = "garbage".into();
    let t = parallel_transformer();
    let a = t.transform(&input);
    let b = t.transform(&input);
    assert_eq!(a.records, b.records);
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn scenario_a_modify_with_both_images() {
    let input = vec![record("a", &modify_envelope("Gloves"))];
    let out = transformer().transform(&input);
    assert_eq!(out.records[0].status, RecordStatus::Ok);

    let doc = decode_output(&out.records[0]);
    assert_eq!(doc["eventName"], "MODIFY");
    assert_eq!(doc["SizeBytes"], 745);
    assert_eq!(doc["NewImage"]["active"], json!(false));
    assert_eq!(doc["OldImage"]["active"], json!(false));
    assert_eq!(doc["OldImage"]["product"], "Gloves");
}

#[test]
fn scenario_b_invalid_base64() {
    let input = vec![InputRecord::new("b", 0, "this is *not* base64")];
    let out = transformer().transform(&input);
    assert_eq!(out.records[0].status, RecordStatus::ProcessingFailed);
    assert_eq!(out.records[0].payload, "this is *not* base64");
    assert_eq!(out.failures[0].1.kind(), "malformed_encoding");
}

#[test]
fn scenario_c_empty_batch() {
    let out = transformer().transform(&[]);
    assert!(out.records.is_empty());
    let summary = SummaryReporter::default().report(&out);
    assert_eq!((summary.total, summary.ok, summary.failed), (0, 0, 0));
}

#[test]
fn scenario_d_mixed_failures_in_order() {
    let mut missing_change = modify_envelope("x");
    missing_change.as_object_mut().unwrap().remove("dynamodb");

    let mut bad_tag = modify_envelope("y");
    bad_tag["dynamodb"]["NewImage"]["active"] = json!({"BOOLEAN": true});

    let input = vec![
        record("d-0", &missing_change),
        record("d-1", &bad_tag),
        record("d-2", &modify_envelope("z")),
    ];
    let out = transformer().transform(&input);

    let statuses: Vec<_> = out.records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        [RecordStatus::ProcessingFailed, RecordStatus::ProcessingFailed, RecordStatus::Ok]
    );
    let ids: Vec<_> = out.records.iter().map(|r| r.record_id.as_str()).collect();
    assert_eq!(ids, ["d-0", "d-1", "d-2"]);
    assert_eq!(out.failures[0].1.kind(), "missing_field");
    assert_eq!(out.failures[1].1.kind(), "invalid_attribute_tag");

    let summary = SummaryReporter::new(false).report(&out);
    assert_eq!((summary.total, summary.ok, summary.failed), (3, 1, 2));
    assert_eq!(summary.sample_ok.unwrap().record_id, "d-2");
    assert_eq!(summary.sample_failed.unwrap().record_id, "d-0");
}

// ─── Invocation boundary ──────────────────────────────────────────────────────

#[test]
fn handle_json_round_trips_firehose_shape() {
    let request = json!({
        "invocationId": "510a881f-8940-4933-9b1f-2c269240a87a",
        "deliveryStreamArn": "arn:aws:firehose:ap-northeast-1:123456789012:deliverystream/orders",
        "region": "ap-northeast-1",
        "records": [
            {
                "recordId": "1",
                "approximateArrivalTimestamp": 1613022603017i64,
                "data": encode(&modify_envelope("Gloves")),
                "kinesisRecordMetadata": {
                    "sequenceNumber": "49615332175504399275388999519764255559777264071916650498",
                    "subsequenceNumber": 0,
                    "partitionKey": "0C37C3E39761B8F376F019B2572B8081",
                    "shardId": "shardId-000000000000",
                    "approximateArrivalTimestamp": 1613022603017i64
                }
            },
            {"recordId": "2", "approximateArrivalTimestamp": 1613022603018i64, "data": "@@"}
        ]
    });
    let body = serde_json::to_vec(&request).unwrap();
    let response_bytes = transformer().handle_json(&body).unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&response_bytes).unwrap();
    assert_eq!(raw["records"][0]["result"], "Ok");
    assert_eq!(raw["records"][1]["result"], "ProcessingFailed");
    assert_eq!(raw["records"][1]["data"], "@@");

    let response: TransformationResponse = serde_json::from_slice(&response_bytes).unwrap();
    assert_eq!(response.records.len(), 2);
}

#[test]
fn partial_stream_metadata_keeps_the_batch() {
    let request = json!({
        "records": [
            {
                "recordId": "1",
                "approximateArrivalTimestamp": 1613022603017i64,
                "data": encode(&modify_envelope("Gloves")),
                "kinesisRecordMetadata": {
                    "shardId": "shardId-000000000001",
                    "approximateArrivalTimestamp": 1613022603017i64
                }
            },
            {
                "recordId": "2",
                "approximateArrivalTimestamp": 1613022603018i64,
                "data": encode(&modify_envelope("Scarf"))
            }
        ]
    });
    let body = serde_json::to_vec(&request).unwrap();
    let response: TransformationResponse =
        serde_json::from_slice(&transformer().handle_json(&body).unwrap()).unwrap();

    assert_eq!(response.records.len(), 2);
    assert!(response.records.iter().all(|r| r.status == RecordStatus::Ok));
    assert_eq!(decode_output(&response.records[1])["OldImage"]["product"], "Scarf");
}

#[test]
fn handle_matches_transform() {
    let event = TransformationEvent::new(valid_batch(3));
    let t = transformer();
    let response = t.handle(&event);
    assert_eq!(response.records, t.transform(&event.records).records);
}
