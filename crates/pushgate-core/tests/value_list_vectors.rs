//! Push body vector tests: wire decode + naming rules end to end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use pushgate_core::naming::translate;
use pushgate_core::protocol::decode_batch;
use pushgate_core::DsType;

use vector_loader::load;

#[test]
fn push_vectors() {
    let files = [
        "swap_gauge.json",
        "cpu_derive.json",
        "if_octets.json",
        "smart_poweron.json",
        "mixed_batch.json",
        "not_an_array.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode_batch(&v.body_bytes());

        if let Some(err) = &v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let batch = res.expect("expected decoded batch");
        assert_eq!(batch.rejected.len(), v.expect_rejected, "vector={}", v.description);

        let mut got = Vec::new();
        for rec in &batch.records {
            rec.validate().expect("vector records are well formed");
            for i in 0..rec.len() {
                if let Some(t) = translate(rec, i) {
                    got.push(t);
                }
            }
        }

        assert_eq!(got.len(), v.expect.len(), "vector={}", v.description);
        for (t, ex) in got.iter().zip(&v.expect) {
            assert_eq!(t.name, ex.name, "vector={}", v.description);
            assert_eq!(t.labels, ex.labels, "vector={}", v.description);
            assert_eq!(t.kind.as_str(), ex.kind, "vector={}", v.description);
            assert_eq!(t.value, ex.value, "vector={}", v.description);
        }
    }
}

#[test]
fn empty_instances_decode_as_absent() {
    let body = Bytes::from_static(
        br#"[{"values":[1],"dstypes":["gauge"],"dsnames":["value"],"time":1,"interval":10,
              "host":"h","plugin":"load","plugin_instance":"","type":"load","type_instance":""}]"#,
    );
    let batch = decode_batch(&body).unwrap();
    let rec = &batch.records[0];
    assert_eq!(rec.plugin_instance, None);
    assert_eq!(rec.type_instance, None);
    assert_eq!(rec.identity().as_str(), "h/load/load");
}

#[test]
fn camel_case_keys_and_null_samples() {
    let body = Bytes::from_static(
        br#"[{"values":[null],"dsTypes":["gauge"],"dsNames":["value"],"time":1,"interval":10,
              "host":"h","plugin":"memory","pluginInstance":"","type":"memory","typeInstance":"free"}]"#,
    );
    let batch = decode_batch(&body).unwrap();
    let rec = &batch.records[0];
    assert!(rec.values[0].is_nan());
    assert_eq!(rec.ds_types, vec![DsType::Gauge]);
    assert_eq!(rec.type_instance.as_deref(), Some("free"));
    assert_eq!(rec.identity().as_str(), "h/memory/memory-free");
}

#[test]
fn empty_body_is_bad_request() {
    let err = decode_batch(&Bytes::new()).unwrap_err();
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}
