// WebSocket transport for the live telemetry feed
use crate::application::telemetry_source::{FeedTransport, TransportEvent};
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

impl FeedTransport for WebSocketTransport {
    fn open(&self) -> BoxStream<'static, TransportEvent> {
        let url = self.url.clone();

        let events = async_stream::stream! {
            tracing::info!("Connecting to live feed at {}", url);
            let mut socket = match connect_async(url.as_str()).await {
                Ok((socket, _response)) => socket,
                Err(e) => {
                    yield TransportEvent::Failed(e.to_string());
                    return;
                }
            };
            yield TransportEvent::Opened;

            while let Some(frame) = socket.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        yield TransportEvent::Message(text);
                    }
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => {
                            yield TransportEvent::Message(text);
                        }
                        Err(_) => tracing::warn!("Ignoring non-UTF-8 binary frame"),
                    },
                    Ok(Message::Close(frame)) => {
                        let (code, reason) = match frame {
                            Some(f) => (Some(u16::from(f.code)), f.reason.into_owned()),
                            None => (None, String::new()),
                        };
                        yield TransportEvent::Closed { code, reason };
                        return;
                    }
                    // ping/pong are answered by tungstenite
                    Ok(_) => {}
                    Err(e) => {
                        yield TransportEvent::Error(e.to_string());
                        return;
                    }
                }
            }

            yield TransportEvent::Closed {
                code: None,
                reason: "connection ended".to_string(),
            };
        };

        events.boxed()
    }
}
