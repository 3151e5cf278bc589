use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use feed_dump::error::{ClientError, ValidationError};
use feed_dump::fetch;
use feed_dump::logger::ErrorLog;
use feed_dump::wire::{Packet, Side, encode_frame};

fn packet(sequence: i32) -> Packet {
    Packet {
        symbol: "ABXC".into(),
        side: Side::Buy,
        quantity: 10,
        price: 100,
        sequence,
    }
}

fn read_request(conn: &mut impl Read) -> [u8; 2] {
    let mut req = [0u8; 2];
    conn.read_exact(&mut req).unwrap();
    req
}

#[test]
fn end_to_end_fills_gaps() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        // bulk connection: stream everything except sequence 2
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [1, 0]);
        for seq in [0, 1, 3, 4] {
            conn.write_all(&encode_frame(&packet(seq))).unwrap();
        }
        drop(conn);

        // recovery connection: answer the resolve for sequence 2
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [2, 2]);
        conn.write_all(&encode_frame(&packet(2))).unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("errlog"));
    let packets = fetch::run("127.0.0.1", port, &log).unwrap();
    server.join().unwrap();

    let seqs: Vec<i32> = packets.iter().map(|p| p.sequence).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
}

#[test]
fn zero_packets_completes_without_recovery_requests() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        // single connection; close without sending anything. A second
        // accept would hang, so the run must not attempt recovery.
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [1, 0]);
    });

    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("errlog"));
    let packets = fetch::run("127.0.0.1", port, &log).unwrap();
    server.join().unwrap();

    assert!(packets.is_empty());
}

#[test]
fn bulk_validation_failure_aborts_run() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [1, 0]);
        conn.write_all(&encode_frame(&packet(0))).unwrap();
        let mut bad = encode_frame(&packet(1));
        bad[4] = b'X';
        conn.write_all(&bad).unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("errlog"));
    let err = fetch::run("127.0.0.1", port, &log).unwrap_err();
    server.join().unwrap();

    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InvalidSide(_))
    ));
}

#[test]
fn recovery_tolerates_invalid_frame_for_one_sequence() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [1, 0]);
        for seq in [0, 3] {
            conn.write_all(&encode_frame(&packet(seq))).unwrap();
        }
        drop(conn);

        // sequence 1 gets a corrupt frame, sequence 2 a good one
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [2, 1]);
        let mut bad = encode_frame(&packet(1));
        bad[4] = b'X';
        conn.write_all(&bad).unwrap();
        assert_eq!(read_request(&mut conn), [2, 2]);
        conn.write_all(&encode_frame(&packet(2))).unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("errlog"));
    let packets = fetch::run("127.0.0.1", port, &log).unwrap();
    server.join().unwrap();

    let seqs: Vec<i32> = packets.iter().map(|p| p.sequence).collect();
    assert_eq!(seqs, vec![0, 2, 3]);
}

#[test]
fn recovery_short_read_leaves_gap_and_logs_it() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [1, 0]);
        for seq in [0, 2] {
            conn.write_all(&encode_frame(&packet(seq))).unwrap();
        }
        drop(conn);

        let (mut conn, _) = listener.accept().unwrap();
        assert_eq!(read_request(&mut conn), [2, 1]);
        // truncated response, then close
        conn.write_all(&encode_frame(&packet(1))[..5]).unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("errlog");
    let log = ErrorLog::new(&log_dir);
    let packets = fetch::run("127.0.0.1", port, &log).unwrap();
    server.join().unwrap();

    let seqs: Vec<i32> = packets.iter().map(|p| p.sequence).collect();
    assert_eq!(seqs, vec![0, 2]);

    let entries: String = std::fs::read_dir(&log_dir)
        .unwrap()
        .map(|e| std::fs::read_to_string(e.unwrap().path()).unwrap())
        .collect();
    assert!(entries.contains("incomplete frame for sequence 1"));
}

#[test]
fn connection_refused_surfaces_as_connection_error() {
    // Grab a free port, then close the listener so nothing is bound.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("errlog"));
    let err = fetch::run("127.0.0.1", port, &log).unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
}
