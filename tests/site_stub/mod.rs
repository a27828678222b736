use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A static file server for a tutorial site. Unknown paths answer 404.
pub struct SiteStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SiteStub {
    pub fn spawn(files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(path, body)| (format!("/{path}"), (*body).to_owned()))
            .collect::<HashMap<_, _>>();

        let server = tiny_http::Server::http("127.0.0.1:0").expect("start site stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                let path = url.split('?').next().unwrap_or(&url).to_owned();
                let _ = match files.get(&path) {
                    Some(body) => request.respond(tiny_http::Response::from_string(body.clone())),
                    None => request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    ),
                };
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for SiteStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub const PAGES_CSV: &str = "\
id,page_title,h1_content,iframe_src,markdown_file,prev_id,prev_text,next_id,next_text
intro,Intro,Welcome to OWL,https://www.youtube.com/embed/intro,md/intro.md,,,components,Next &rarr;
components,Components,Writing components,,md/components.md,intro,&larr; Intro,hooks,Next &rarr;
broken,Broken, row, with commas,,md/broken.md,,,,
hooks,,Hooks,,md/missing.md,components,&larr; Components,,
";

pub const INTRO_MD: &str = "# Getting started\n\nOWL is a component framework.\n";
pub const COMPONENTS_MD: &str = "## Components\n\n```js\nclass Counter extends Component {}\n```\n";
