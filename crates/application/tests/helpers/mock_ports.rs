use async_trait::async_trait;
use metric_rdns_application::ports::{HostnameLookup, MetricSink};
use metric_rdns_domain::{FieldValue, Metric};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct CollectingSink {
    metrics: Mutex<Vec<Metric>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.metrics.lock().unwrap().len()
    }

    /// Values of the integer field `seq`, in delivery order.
    pub fn sequence(&self) -> Vec<i64> {
        self.metrics()
            .iter()
            .filter_map(|m| match m.get_field("seq") {
                Some(FieldValue::Integer(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }
}

impl MetricSink for CollectingSink {
    fn pass_metric(&self, metric: Metric) {
        self.metrics.lock().unwrap().push(metric);
    }
}

pub fn seq_metric(seq: i64) -> Metric {
    Metric::new("test").with_field("seq", seq)
}

struct ScriptedAnswer {
    names: Vec<String>,
    delay: Duration,
}

pub struct MockHostnameLookup {
    answers: Mutex<HashMap<String, ScriptedAnswer>>,
    call_count: Arc<AtomicU64>,
    requested: Mutex<Vec<String>>,
}

impl MockHostnameLookup {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            call_count: Arc::new(AtomicU64::new(0)),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_answer(self, ip: &str, names: &[&str]) -> Self {
        self.with_delayed_answer(ip, names, Duration::ZERO)
    }

    pub fn with_delayed_answer(self, ip: &str, names: &[&str], delay: Duration) -> Self {
        self.answers.lock().unwrap().insert(
            ip.to_string(),
            ScriptedAnswer {
                names: names.iter().map(|n| n.to_string()).collect(),
                delay,
            },
        );
        self
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostnameLookup for MockHostnameLookup {
    async fn lookup(&self, ip: &str) -> Vec<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(ip.to_string());

        let scripted = {
            let answers = self.answers.lock().unwrap();
            answers.get(ip).map(|a| (a.names.clone(), a.delay))
        };

        match scripted {
            Some((names, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                names
            }
            None => Vec::new(),
        }
    }
}
