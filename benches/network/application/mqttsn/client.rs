use criterion::{BatchSize, Criterion, Throughput};
use libmqttsn::network::application::mqttsn::{
    Client, Flags, MAX_FRAME_SIZE, Message, NoopHandler, Options, QoS, ReturnCode,
};
use libmqttsn::network::error::Error;
use libmqttsn::network::{Available, Connection, Read, Write};
use libmqttsn::system::clock::Clock;
use std::collections::VecDeque;
use std::hint::black_box;

/// Loopback link: writes are counted and dropped, reads come from `inbound`.
#[derive(Default)]
struct MemConnection {
    inbound: VecDeque<u8>,
    written: usize,
}

impl Read for MemConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.inbound.len());
        for (slot, b) in buf.iter_mut().zip(self.inbound.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }
}

impl Write for MemConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Available for MemConnection {
    fn available(&mut self) -> usize {
        self.inbound.len()
    }
}

impl Connection for MemConnection {}

struct Frozen;

impl Clock for Frozen {
    fn now_millis(&self) -> u32 {
        0
    }
}

type BenchClient = Client<MemConnection, Frozen, NoopHandler>;

fn setup_client(client_id: &str) -> BenchClient {
    let opts = Options {
        client_id,
        ..Options::default()
    };
    Client::new(MemConnection::default(), Frozen, NoopHandler, &opts).expect("valid options")
}

fn publish_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let len = Message::Publish {
        flags: Flags::new().with_qos(QoS::AtMostOnce),
        topic_id: 1,
        message_id: 0,
        data: payload,
    }
    .encode(&mut buf)
    .expect("fits");
    buf[..len].to_vec()
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let payload = [0x42u8; 48];
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("encode_publish", |b| {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        b.iter(|| {
            let message = Message::Publish {
                flags: Flags::new().with_qos(QoS::AtLeastOnce),
                topic_id: black_box(7),
                message_id: black_box(99),
                data: &payload,
            };
            black_box(message.encode(&mut buf).expect("fits"));
        });
    });
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let frame = publish_frame(&[0x42u8; 48]);
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("decode_publish", |b| {
        b.iter(|| black_box(Message::decode(black_box(&frame)).expect("valid")));
    });
    group.finish();
}

pub fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");
    let payload = b"hello from publish";
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("publish_qos0", |b| {
        b.iter_batched_ref(
            || setup_client("bench-publish"),
            |client| {
                client
                    .publish(1, payload, QoS::AtMostOnce)
                    .expect("Failed to publish");
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

pub fn bench_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll");
    let frame = publish_frame(b"inbound reading 21.5C");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("poll_inbound_publish", |b| {
        b.iter_batched_ref(
            || {
                let mut client = setup_client("bench-poll");
                client.connection_mut().inbound.extend(frame.iter().copied());
                client
            },
            |client| {
                black_box(client.poll().expect("Failed to poll"));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

pub fn bench_publish_and_ack_qos1(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_and_ack");
    let payload = b"hello from publish_and_ack_qos1";
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("qos1", |b| {
        b.iter_batched_ref(
            || setup_client("bench-qos1"),
            |client| {
                client
                    .publish(1, payload, QoS::AtLeastOnce)
                    .expect("Failed to publish");
                let mut ack = [0u8; MAX_FRAME_SIZE];
                let len = Message::PubAck {
                    topic_id: 1,
                    message_id: client.message_id(),
                    return_code: ReturnCode::Accepted,
                }
                .encode(&mut ack)
                .expect("fits");
                client.connection_mut().inbound.extend(ack[..len].iter().copied());
                black_box(client.poll().expect("Failed to poll"));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}
