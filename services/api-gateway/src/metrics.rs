//! Prometheus metrics for lookups and document scans.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    lookups: IntCounterVec,
    scans: IntCounterVec,
    scan_failures: IntCounterVec,
    scan_matches: HistogramVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("chemsure".to_string()), None)?;

        let lookups = IntCounterVec::new(
            Opts::new("lookups_total", "Reference lookups by kind and outcome"),
            &["kind", "outcome"],
        )?;
        let scans = IntCounterVec::new(
            Opts::new("msds_scans_total", "Completed MSDS scans by text source"),
            &["text_source"],
        )?;
        let scan_failures = IntCounterVec::new(
            Opts::new("msds_scan_failures_total", "Failed MSDS scans by error code"),
            &["code"],
        )?;
        let scan_matches = HistogramVec::new(
            HistogramOpts::new("msds_scan_matches", "Listed substances found per scan")
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
            &["text_source"],
        )?;

        registry.register(Box::new(lookups.clone()))?;
        registry.register(Box::new(scans.clone()))?;
        registry.register(Box::new(scan_failures.clone()))?;
        registry.register(Box::new(scan_matches.clone()))?;

        Ok(Self {
            registry,
            lookups,
            scans,
            scan_failures,
            scan_matches,
        })
    }

    pub fn record_lookup(&self, kind: &str, outcome: &str) {
        self.lookups.with_label_values(&[kind, outcome]).inc();
    }

    pub fn record_scan(&self, text_source: &str, matches: usize) {
        self.scans.with_label_values(&[text_source]).inc();
        self.scan_matches
            .with_label_values(&[text_source])
            .observe(matches as f64);
    }

    pub fn record_scan_failure(&self, code: &str) {
        self.scan_failures.with_label_values(&[code]).inc();
    }

    /// Text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
