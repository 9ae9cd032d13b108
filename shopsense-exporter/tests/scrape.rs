//! Scrape the listener over a real loopback socket

use std::net::SocketAddr;

use shopsense_core::traits::MetricsSink;
use shopsense_core::Metric;
use shopsense_exporter::{server, PrometheusSink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start(sink: &PrometheusSink) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, sink.registry().clone()));
    addr
}

async fn request(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    reply
}

#[tokio::test]
async fn test_scrape_returns_published_values() {
    let mut sink = PrometheusSink::new().unwrap();
    sink.publish(Metric::Temperature, 18.8).unwrap();
    sink.publish(Metric::Pm2_5, 1.6).unwrap();
    let addr = start(&sink).await;

    let reply = request(addr, "GET /metrics HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(reply.contains("Content-Type: text/plain; version=0.0.4\r\n"));
    assert!(reply.contains("shop_temperature 18.8\n"));
    assert!(reply.contains("shop_PM2 1.6\n"));
    // Gas gauges are always listed, even if never set
    assert!(reply.contains("shop_nh3 0\n"));
}

#[tokio::test]
async fn test_scrape_sees_later_updates() {
    let mut sink = PrometheusSink::new().unwrap();
    let addr = start(&sink).await;

    sink.publish(Metric::Humidity, 61.2).unwrap();
    let first = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
    sink.publish(Metric::Humidity, 60.9).unwrap();
    let second = request(addr, "GET / HTTP/1.1\r\n\r\n").await;

    assert!(first.contains("shop_humidity 61.2\n"));
    assert!(second.contains("shop_humidity 60.9\n"));
}

#[tokio::test]
async fn test_head_and_rejected_methods() {
    let sink = PrometheusSink::new().unwrap();
    let addr = start(&sink).await;

    let head = request(addr, "HEAD / HTTP/1.1\r\n\r\n").await;
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.ends_with("\r\n\r\n"));

    let post = request(addr, "POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    assert!(post.starts_with("HTTP/1.1 405 "));
}

#[tokio::test]
async fn test_peer_closing_early_does_not_stop_listener() {
    let sink = PrometheusSink::new().unwrap();
    let addr = start(&sink).await;

    drop(TcpStream::connect(addr).await.unwrap());

    let reply = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[test]
fn test_bind_reports_taken_port() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap();

    let err = server::bind(addr).unwrap_err();
    assert!(err.to_string().contains(&addr.to_string()));
}
