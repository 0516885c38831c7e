#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pushgate_core::exposition::{encode, format_value, Labels};
use pushgate_core::{MetricFamily, MetricKind, Sample};

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn family_has_one_header_and_sorted_labels() {
    let mut fam = MetricFamily::new(
        "collectd_cpu_total".into(),
        "Collectd exporter: 'cpu' Type: 'cpu' Dstype: 'derive' Dsname: 'value'".into(),
        MetricKind::Counter,
    );
    fam.samples.push(Sample {
        labels: labels(&[("type", "idle"), ("cpu", "0"), ("instance", "h1")]),
        value: 10.0,
    });
    fam.samples.push(Sample {
        labels: labels(&[("type", "user"), ("cpu", "0"), ("instance", "h1")]),
        value: 2.5,
    });

    let mut out = String::new();
    encode([&fam], &mut out);

    let expected = "\
# HELP collectd_cpu_total Collectd exporter: 'cpu' Type: 'cpu' Dstype: 'derive' Dsname: 'value'
# TYPE collectd_cpu_total counter
collectd_cpu_total{cpu=\"0\",instance=\"h1\",type=\"idle\"} 10
collectd_cpu_total{cpu=\"0\",instance=\"h1\",type=\"user\"} 2.5
";
    assert_eq!(out, expected);
}

#[test]
fn label_values_and_help_are_escaped() {
    let mut fam = MetricFamily::new("m".into(), "line\\one\nline two".into(), MetricKind::Gauge);
    fam.samples.push(Sample {
        labels: labels(&[("path", "C:\\dir \"x\"\n")]),
        value: 1.0,
    });

    let mut out = String::new();
    fam.encode(&mut out);

    assert!(out.contains("# HELP m line\\\\one\\nline two\n"));
    assert!(out.contains("m{path=\"C:\\\\dir \\\"x\\\"\\n\"} 1\n"));
}

#[test]
fn sample_without_labels_has_no_braces() {
    let mut fam = MetricFamily::new("up".into(), "up".into(), MetricKind::Gauge);
    fam.samples.push(Sample {
        labels: Labels::new(),
        value: 1.0,
    });
    let mut out = String::new();
    fam.encode(&mut out);
    assert!(out.ends_with("\nup 1\n"));
}

#[test]
fn special_float_values() {
    assert_eq!(format_value(f64::NAN), "NaN");
    assert_eq!(format_value(f64::INFINITY), "+Inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    assert_eq!(format_value(42.0), "42");
    assert_eq!(format_value(-0.25), "-0.25");
}
