use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hotmirror::fetch::transport::scripted::ScriptedTransport;
use hotmirror::fetch::{Fetcher, TransportError};
use hotmirror::protocol::prelude::*;
use std::time::Duration;

fn origin() -> OriginIdentity {
    OriginIdentity::new("acme", "hotwords", "main").expect("origin")
}

fn bench_materialize_registry(c: &mut Criterion) {
    let origin = origin();
    c.bench_function("materialize_registry", |b| {
        b.iter(|| {
            let out = materialize(black_box(&origin), list_templates(), ARTIFACTS);
            black_box(out.artifacts.len())
        })
    });
}

fn bench_manifest_serialize(c: &mut Criterion) {
    let origin = origin();
    let Materialized { artifacts, .. } = materialize(&origin, list_templates(), ARTIFACTS);
    let manifest = EndpointManifest::new(origin, artifacts, chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
    c.bench_function("manifest_json_roundtrip", |b| {
        b.iter(|| {
            let json = manifest.to_json_pretty().expect("serialize");
            black_box(EndpointManifest::from_json(&json).expect("parse"))
        })
    });
}

fn bench_fallback_to_last(c: &mut Criterion) {
    let origin = origin();
    let materialized = materialize(&origin, list_templates(), &[LATEST_TEXT]);
    let candidates = materialized
        .candidates(LATEST_TEXT.name())
        .expect("candidates")
        .to_vec();
    let mut transport = ScriptedTransport::new();
    for c in &candidates[..candidates.len() - 1] {
        transport = transport.fail(&c.url, TransportError::Connect("refused".into()));
    }
    let last = &candidates[candidates.len() - 1];
    transport = transport.respond(&last.url, 200, "【AI】:[GPT]\n");
    let fetcher = Fetcher::new(transport, Duration::from_secs(1));

    c.bench_function("fetch_fallback_to_last", |b| {
        b.iter(|| black_box(fetcher.fetch(&candidates).expect("last mirror serves")))
    });
}

criterion_group!(
    benches,
    bench_materialize_registry,
    bench_manifest_serialize,
    bench_fallback_to_last
);
criterion_main!(benches);
