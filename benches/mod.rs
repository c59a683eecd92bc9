use criterion::{criterion_group, criterion_main};

mod network {
    pub mod application {
        pub mod mqttsn {
            pub mod client;
        }
    }
}

criterion_group!(
    benches,
    network::application::mqttsn::client::bench_encode,
    network::application::mqttsn::client::bench_decode,
    network::application::mqttsn::client::bench_publish,
    network::application::mqttsn::client::bench_poll,
    network::application::mqttsn::client::bench_publish_and_ack_qos1
);
criterion_main!(benches);
