#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use cdm_collections::args::{Config, Mode};

/// Canned reply for one `q=` query of the web services endpoint.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

pub fn ok(body: &str) -> Reply {
    Reply {
        status: 200,
        body: body.to_string(),
    }
}

pub fn status(code: u16) -> Reply {
    Reply {
        status: code,
        body: String::new(),
    }
}

/// Minimal HTTP/1.1 server answering a fixed number of GET requests.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn start(routes: Vec<(&str, Reply)>, requests: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, Reply> = routes
            .into_iter()
            .map(|(query, reply)| (query.to_string(), reply))
            .collect();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..requests {
                let (mut stream, _) = listener.accept().expect("accept");
                let head = read_request_head(&mut stream);
                let target = head.split_whitespace().nth(1).unwrap_or("").to_string();
                let query = target.split("q=").nth(1).unwrap_or("").to_string();

                let reply = routes.get(&query).cloned().unwrap_or_else(|| status(404));
                let response = format!(
                    "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                stream.write_all(response.as_bytes()).expect("write response");
                seen.push(query);
            }
            seen
        });

        StubServer { base_url, handle }
    }

    /// Queries received, in order.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().expect("stub server thread")
    }
}

fn read_request_head(stream: &mut impl Read) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

pub fn locale_xml(title: &str, description: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tmx version="1.4">
  <header/>
  <body>
    <tu tuid="SITE_CONFIG_title">
      <tuv xml:lang="en_US"><seg>{title}</seg></tuv>
    </tu>
    <tu tuid="SITE_CONFIG_landingPageHtml">
      <tuv xml:lang="en_US"><seg>{description}</seg></tuv>
    </tu>
  </body>
</tmx>
"#
    )
}

/// Lay out a `coll_<alias>` configuration directory.
pub fn write_collection(base: &Path, alias: &str, locale: Option<&str>, ini: Option<&str>) -> PathBuf {
    let dir = base.join(format!("coll_{alias}"));
    fs::create_dir_all(&dir).unwrap();
    if let Some(xml) = locale {
        let languages = dir.join("resources/languages");
        fs::create_dir_all(&languages).unwrap();
        fs::write(languages.join(format!("cdm_language_coll_{alias}.xml")), xml).unwrap();
    }
    if let Some(ini) = ini {
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::write(dir.join("config/cdm_collection.ini"), ini).unwrap();
    }
    dir
}

pub fn local_config(collection_dir: &Path, public_html_dir: &Path, output_dir: &Path) -> Config {
    Config {
        mode: Mode::Local,
        collection_dir: collection_dir.to_path_buf(),
        public_html_dir: public_html_dir.to_path_buf(),
        locale: "en_US".to_string(),
        api_url: None,
        output_dir: output_dir.to_path_buf(),
        field_info: false,
    }
}
