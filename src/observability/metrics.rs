use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub transitions_total: IntCounterVec,
    pub claims_total: IntCounterVec,
    pub request_resolutions_total: IntCounterVec,
    pub orders_active: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Order status transitions by target"),
            &["to"],
        )
        .expect("valid transitions_total metric");

        let claims_total = IntCounterVec::new(
            Opts::new("claims_total", "Delivery claim attempts by outcome"),
            &["outcome"],
        )
        .expect("valid claims_total metric");

        let request_resolutions_total = IntCounterVec::new(
            Opts::new(
                "request_resolutions_total",
                "Escalated claim requests resolved, by decision",
            ),
            &["decision"],
        )
        .expect("valid request_resolutions_total metric");

        let orders_active = IntGauge::new(
            "orders_active",
            "Orders currently in a non-terminal status",
        )
        .expect("valid orders_active metric");

        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(claims_total.clone()))
            .expect("register claims_total");
        registry
            .register(Box::new(request_resolutions_total.clone()))
            .expect("register request_resolutions_total");
        registry
            .register(Box::new(orders_active.clone()))
            .expect("register orders_active");

        Self {
            registry,
            transitions_total,
            claims_total,
            request_resolutions_total,
            orders_active,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
