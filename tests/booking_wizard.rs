//! End-to-end run of the Booking.com wizard against a local mock extranet.
//!
//! Needs a Chrome binary (set `CHROMIUM_PATH` when it is not on the PATH):
//! `cargo test --test booking_wizard -- --ignored`

use listing_uploader::automation::{ArtifactRecorder, ChromePage, RunOptions, SubmissionOutcome, Timeouts};
use listing_uploader::config::Credentials;
use listing_uploader::models::SourceRow;
use listing_uploader::pipeline::export::PortalRow;
use listing_uploader::pipeline::{parse_row, BookingRow, ValidationRules};
use listing_uploader::portals::Portal;
use listing_uploader::uploader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

const WIZARD_PATH: &str = "/hotel/hoteladmin/overview/create/";

const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
  <h1>Sign in</h1>
  <form method="POST" action="/login">
    <input id="loginname" name="loginname" type="email" placeholder="Email" />
    <input id="password" name="password" type="password" placeholder="Password" />
    <button type="submit" class="bui-button--primary">Sign in</button>
  </form>
</body>
</html>"#;

const EXTRANET_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Extranet</title></head>
<body>
  <h1>Extranet</h1>
  <nav><a href="/hotel/hoteladmin/overview/create/">List your property</a></nav>
</body>
</html>"#;

const WIZARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Register property</title></head>
<body>
  <h1>Register your property</h1>
  <form method="POST" action="/salva">
    <label><input type="radio" name="property_type" value="apartment" /> Apartment</label>
    <label><input type="radio" name="property_type" value="villa" /> Villa</label>
    <label><input type="radio" name="property_type" value="house" /> House</label>

    <input name="property_name" placeholder="Property name" />
    <textarea name="description" rows="4" placeholder="Description"></textarea>

    <input name="address" placeholder="Street address" />
    <input name="city" placeholder="City" />
    <input name="postcode" placeholder="Postcode" />
    <select name="country">
      <option value="">Country</option>
      <option value="IT">Italy</option>
      <option value="DE">Germany</option>
    </select>

    <input name="max_guests" type="number" placeholder="Max guests" />
    <input name="bathrooms" type="number" placeholder="Bathrooms" />
    <input name="size" type="number" step="0.1" placeholder="Size sqm" />

    <input name="price" type="number" step="0.01" placeholder="Price per night" />

    <input name="check_in" placeholder="Check-in from" />
    <input name="check_out" placeholder="Check-out until" />

    <input name="contact_email" type="email" placeholder="Contact email" />
    <input name="phone" type="tel" placeholder="Phone number" />

    <button type="submit">Save and continue</button>
  </form>
</body>
</html>"#;

const CONFIRMATION_HTML: &str = "<html><body><h1>Registration complete</h1>\
    <p>Your property has been submitted successfully.</p></body></html>";

type Submissions = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serves the mock extranet on a random port; returns the base URL
fn start_server(submissions: Submissions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            // Speculative connections that never send a request must not stall the loop
            let _ = stream.set_read_timeout(Some(Duration::from_secs(1)));
            let _ = handle(stream, &submissions);
        }
    });
    base
}

fn handle(stream: TcpStream, submissions: &Submissions) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string();

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    let mut stream = stream;
    if method == "POST" {
        if path == "/login" {
            return write!(
                stream,
                "HTTP/1.1 302 Found\r\nLocation: {WIZARD_PATH}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
        }
        let fields = url::form_urlencoded::parse(&body).into_owned().collect();
        submissions.lock().unwrap().push(fields);
        return respond(&mut stream, CONFIRMATION_HTML);
    }

    let page = if path == "/login" || path == "/sign-in" {
        LOGIN_HTML
    } else if path.starts_with("/hotel") {
        WIZARD_HTML
    } else {
        EXTRANET_HTML
    };
    respond(&mut stream, page)
}

fn respond(stream: &mut TcpStream, body: &str) -> std::io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

fn test_row() -> SourceRow {
    SourceRow {
        name: "Appartamento Test Stintino".to_string(),
        description: "Bilocale a 200 metri dalla spiaggia della Pelosa.".to_string(),
        structure_type: "appartamento".to_string(),
        address: "Via Sassari 12".to_string(),
        city: "Stintino".to_string(),
        province: "SS".to_string(),
        postal_code: "07040".to_string(),
        max_guests: "4".to_string(),
        bathrooms: "1".to_string(),
        area_sqm: "55".to_string(),
        price_per_night: "120".to_string(),
        available_from: "2026-06-01".to_string(),
        available_to: "2026-09-30".to_string(),
        check_in: "15:00".to_string(),
        check_out: "10:00".to_string(),
        contact_email: "host@example.it".to_string(),
        contact_phone: "079 523456".to_string(),
        amenities: "wifi".to_string(),
        ..Default::default()
    }
}

#[test]
#[ignore = "needs a local Chrome"]
fn booking_wizard_fills_every_field_and_submits() {
    let submissions: Submissions = Arc::default();
    let base = start_server(submissions.clone());

    let record = parse_row(test_row(), 1, &ValidationRules::default());
    assert!(record.is_valid(), "{:?}", record.errors);

    let mut profile = Portal::Booking.profile();
    profile.login.url = format!("{base}/login");
    profile.entry.home = None;
    profile.entry.links.clear();
    profile.entry.urls = vec![format!("{base}{WIZARD_PATH}")];

    let options = RunOptions {
        submit: true,
        pause: Duration::ZERO,
        timeouts: Timeouts {
            field: Duration::from_secs(1),
            probe: Duration::from_millis(300),
            max_settle: Duration::from_secs(1),
        },
        ..RunOptions::default()
    };
    let credentials = Credentials {
        email: "test@test.it".to_string(),
        password: "testpwd".to_string(),
    };
    let artifacts_dir = tempdir().unwrap();

    let chromium = std::env::var("CHROMIUM_PATH").ok().map(PathBuf::from);
    let page = ChromePage::launch(true, chromium).unwrap();
    let summary = uploader::drive(
        &page,
        &profile,
        std::slice::from_ref(&record),
        &credentials,
        ArtifactRecorder::new(artifacts_dir.path()).unwrap(),
        &options,
    )
    .unwrap();

    let outcome = &summary.records[0];
    assert!(outcome.wizard_opened);
    assert_eq!(
        outcome.report.submission,
        SubmissionOutcome::Confirmed("success".to_string())
    );

    let received = submissions.lock().unwrap();
    assert_eq!(received.len(), 1, "expected exactly one form submission");
    let form = &received[0];
    let expected = BookingRow::project(&record);

    assert_eq!(form["property_type"], "apartment");
    assert_eq!(form["property_name"], expected.property_name);
    assert_eq!(form["description"], expected.description_it);
    assert_eq!(form["address"], expected.address_line1);
    assert_eq!(form["city"], "Stintino");
    assert_eq!(form["postcode"], "07040");
    assert_eq!(form["country"], expected.country);
    assert_eq!(form["max_guests"], "4");
    assert_eq!(form["bathrooms"], expected.bathrooms);
    assert_eq!(form["size"], expected.size_sqm);
    assert_eq!(form["price"], "120.00");
    assert_eq!(form["check_in"], "15:00");
    assert_eq!(form["check_out"], "10:00");
    assert_eq!(form["contact_email"], expected.contact_email);
    assert_eq!(form["phone"], expected.contact_phone);

    assert!(artifacts_dir.path().join("summary.txt").exists());
    assert!(artifacts_dir.path().join("review.html").exists());
}
