//! Bulk fetch, recovery fetch, and assembly of the final dataset.
//!
//! The two fetch paths deliberately handle errors differently. The bulk
//! stream is the trusted primary source: a validation failure there
//! signals a protocol mismatch and aborts the run. Recovery patches
//! known gaps best-effort: every per-item failure is logged and skipped,
//! and a connection failure mid-batch returns the partial result.
//!
//! The fetchers are generic over `Read + Write` so tests can drive them
//! with an in-memory stream; the `TcpStream` wrappers are the production
//! entry points. Each connection is opened immediately before use and
//! dropped when its fetch returns, on success or failure.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::Result;
use crate::gaps::find_missing;
use crate::logger::ErrorLog;
use crate::wire::{self, FRAME_LEN, Packet};

/// Fill `buf` from the stream. Returns the number of bytes read: 0 on a
/// clean end of stream, [`FRAME_LEN`] for a whole frame, anything in
/// between when the peer closed mid-frame.
fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8; FRAME_LEN]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < FRAME_LEN {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Stream every packet the server has over a single connection.
pub fn fetch_all(addr: impl ToSocketAddrs, log: &ErrorLog) -> Result<Vec<Packet>> {
    let stream = TcpStream::connect(addr)?;
    fetch_all_from(stream, log)
}

/// Bulk fetch against an already-open stream: send the stream-all
/// request, then decode frames until the peer closes. A trailing short
/// frame is logged and dropped; decode failures propagate.
pub fn fetch_all_from<S: Read + Write>(mut stream: S, log: &ErrorLog) -> Result<Vec<Packet>> {
    stream.write_all(&wire::encode_stream_all())?;
    stream.flush()?;

    let mut packets = Vec::new();
    let mut buf = [0u8; FRAME_LEN];
    loop {
        match read_frame(&mut stream, &mut buf)? {
            0 => break,
            FRAME_LEN => packets.push(wire::decode_frame(&buf)?),
            n => log.warn(format!(
                "bulk stream produced a short frame ({n} of {FRAME_LEN} bytes); dropped"
            )),
        }
    }
    Ok(packets)
}

/// Re-request each missing sequence over one shared connection.
///
/// Returns immediately without connecting when `missing` is empty. A
/// connect failure is logged and yields an empty result; partial
/// success is the normal case, not an error.
pub fn fetch_missing(addr: impl ToSocketAddrs, missing: &[i32], log: &ErrorLog) -> Vec<Packet> {
    if missing.is_empty() {
        return Vec::new();
    }
    let stream = match TcpStream::connect(addr) {
        Ok(s) => s,
        Err(e) => {
            log.error(format!("recovery connect failed: {e}"));
            return Vec::new();
        }
    };
    fetch_missing_from(stream, missing, log)
}

/// Recovery fetch against an already-open stream. Each sequence is
/// handled independently: encode failures, short reads, and invalid
/// frames are logged and skipped; a transport failure ends the batch
/// and returns whatever was recovered so far.
pub fn fetch_missing_from<S: Read + Write>(
    mut stream: S,
    missing: &[i32],
    log: &ErrorLog,
) -> Vec<Packet> {
    let mut recovered = Vec::new();
    let mut buf = [0u8; FRAME_LEN];
    for &seq in missing {
        let request = match wire::encode_resolve(seq) {
            Ok(r) => r,
            Err(e) => {
                log.error(format!("cannot request sequence {seq}: {e}"));
                continue;
            }
        };
        if let Err(e) = stream.write_all(&request).and_then(|()| stream.flush()) {
            log.error(format!("recovery connection failed at sequence {seq}: {e}"));
            return recovered;
        }
        match read_frame(&mut stream, &mut buf) {
            Ok(FRAME_LEN) => match wire::decode_frame(&buf) {
                Ok(packet) => recovered.push(packet),
                Err(e) => log.error(format!("invalid frame for sequence {seq}: {e}")),
            },
            Ok(n) => log.warn(format!(
                "incomplete frame for sequence {seq} ({n} of {FRAME_LEN} bytes); skipped"
            )),
            Err(e) => {
                log.error(format!("recovery read failed at sequence {seq}: {e}"));
                return recovered;
            }
        }
    }
    recovered
}

/// Merge bulk and recovered packets into one list, ascending by
/// sequence. No deduplication; the sort is stable.
pub fn assemble(bulk: Vec<Packet>, recovered: Vec<Packet>) -> Vec<Packet> {
    let mut all = bulk;
    all.extend(recovered);
    all.sort_by_key(|p| p.sequence);
    all
}

/// Full client run: bulk fetch, gap detection, recovery, assembly.
///
/// A zero-packet bulk result short-circuits recovery entirely; the
/// caller decides what an empty dataset means (typically "nothing to
/// save").
pub fn run(host: &str, port: u16, log: &ErrorLog) -> Result<Vec<Packet>> {
    let bulk = fetch_all((host, port), log)?;
    let missing = find_missing(&bulk);
    let recovered = if missing.is_empty() {
        Vec::new()
    } else {
        fetch_missing((host, port), &missing, log)
    };
    Ok(assemble(bulk, recovered))
}
