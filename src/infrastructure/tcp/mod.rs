// Read-only client for the controller's TCP service
pub mod calculations;
pub mod datatype;

use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use crate::domain::value::Value;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

pub const DEFAULT_PORT: u16 = 8889;

const READ_PARAMETERS: i32 = 3003;
const READ_CALCULATIONS: i32 = 3004;
const READ_VISIBILITIES: i32 = 3005;

/// Upper bound on the word count a reply may announce.
const MAX_WORDS: i32 = 16_384;

const TIMESTAMP_FIELD: &str = "ID_WEB_AktuelleTimeStamp";

/// Raw blocks of one readout, in controller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readout {
    pub parameters: Vec<i32>,
    pub calculations: Vec<i32>,
    pub visibilities: Vec<u8>,
}

fn connection(e: impl std::fmt::Display) -> Error {
    Error::Connection(e.to_string())
}

async fn request<S>(stream: &mut S, command: i32) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_i32(command).await.map_err(connection)?;
    stream.write_i32(0).await.map_err(connection)?;
    stream.flush().await.map_err(connection)?;

    let echo = stream.read_i32().await.map_err(connection)?;
    if echo != command {
        return Err(Error::Protocol(format!(
            "expected echo of command {}, got {}",
            command, echo
        )));
    }
    Ok(())
}

async fn read_length<S: AsyncRead + Unpin>(stream: &mut S) -> Result<usize> {
    let length = stream.read_i32().await.map_err(connection)?;
    if !(0..=MAX_WORDS).contains(&length) {
        return Err(Error::Protocol(format!("implausible block length {}", length)));
    }
    Ok(length as usize)
}

async fn read_words<S: AsyncRead + Unpin>(stream: &mut S, length: usize) -> Result<Vec<i32>> {
    let mut words = Vec::with_capacity(length);
    for _ in 0..length {
        words.push(stream.read_i32().await.map_err(connection)?);
    }
    Ok(words)
}

pub async fn read_parameters<S>(stream: &mut S) -> Result<Vec<i32>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    request(stream, READ_PARAMETERS).await?;
    let length = read_length(stream).await?;
    read_words(stream, length).await
}

pub async fn read_calculations<S>(stream: &mut S) -> Result<Vec<i32>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    request(stream, READ_CALCULATIONS).await?;
    let status = stream.read_i32().await.map_err(connection)?;
    tracing::trace!("Calculations status {}", status);
    let length = read_length(stream).await?;
    read_words(stream, length).await
}

pub async fn read_visibilities<S>(stream: &mut S) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    request(stream, READ_VISIBILITIES).await?;
    let length = read_length(stream).await?;
    let mut flags = vec![0u8; length];
    stream.read_exact(&mut flags).await.map_err(connection)?;
    Ok(flags)
}

/// Parameters, calculations and visibilities over one connection.
pub async fn read_all<S>(stream: &mut S) -> Result<Readout>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let parameters = read_parameters(stream).await?;
    let calculations = read_calculations(stream).await?;
    let visibilities = read_visibilities(stream).await?;
    Ok(Readout {
        parameters,
        calculations,
        visibilities,
    })
}

/// `host:port` for a host given as IP, name, URL or with another port.
pub fn socket_address(host: &str, port: u16) -> String {
    let host = host
        .trim()
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_start_matches("ws://");
    let host = host.split('/').next().unwrap_or(host);
    let host = match host.rsplit_once(':') {
        Some((name, maybe_port)) if maybe_port.parse::<u16>().is_ok() => name,
        _ => host,
    };
    format!("{}:{}", host, port)
}

/// Connect to `host` and read one full readout.
pub async fn fetch(host: &str, port: u16, timeout: Duration) -> Result<Readout> {
    let address = socket_address(host, port);
    tracing::debug!("Reading values from {}", address);

    let exchange = async {
        let mut stream = TcpStream::connect(&address).await.map_err(connection)?;
        read_all(&mut stream).await
    };
    let readout = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| Error::Connection(format!("{} timed out after {:?}", address, timeout)))??;

    tracing::info!(
        "Read {} parameters, {} calculations, {} visibilities from {}",
        readout.parameters.len(),
        readout.calculations.len(),
        readout.visibilities.len(),
        address
    );
    Ok(readout)
}

impl Readout {
    /// One frame holding every word under its field name.
    ///
    /// Time is the controller's own clock when it reports one, the local clock otherwise.
    pub fn to_frame(&self) -> Frame {
        let time = calculations::index_of(TIMESTAMP_FIELD)
            .and_then(|i| self.calculations.get(i))
            .filter(|stamp| **stamp > 0)
            .map(|stamp| *stamp as i64)
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let mut frame = Frame::with_time(time);

        for (i, raw) in self.parameters.iter().enumerate() {
            frame.insert(format!("Unknown_Parameter_{}", i), Value::integer(*raw as i64));
        }
        for (i, raw) in self.calculations.iter().enumerate() {
            match calculations::CALCULATIONS.get(i) {
                Some(field) => frame.insert(field.name, field.kind.read(*raw)),
                None => frame.insert(format!("Unknown_Calculation_{}", i), Value::integer(*raw as i64)),
            }
        }
        for (i, flag) in self.visibilities.iter().enumerate() {
            frame.insert(format!("Unknown_Visibility_{}", i), Value::integer(*flag as i64));
        }
        frame
    }
}
