use std::io::{BufRead, Write};

use eyre::Result;
use log::{error, info, warn};

use crate::catalog::{QualityOption, build_catalog};
use crate::job::{CRF, JobPlan, JobRequest, TimeRange};
use crate::output::{self, RULE};
use crate::timecode::{clock_to_seconds, seconds_to_clock};
use crate::tools::Toolchain;

/// Menu states; the session loop moves from one to the next until `Exit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Download,
    CompressionMenu,
    RemoteCompress,
    LocalCompress,
    Pause,
    Exit,
}

/// Interactive menu over a line-oriented terminal
pub struct Session<T, R, W> {
    tools: T,
    input: R,
    output: W,
}

impl<T: Toolchain, R: BufRead, W: Write> Session<T, R, W> {
    pub fn new(tools: T, input: R, output: W) -> Self {
        Self { tools, input, output }
    }

    /// Drive the menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        let mut screen = Screen::MainMenu;
        while screen != Screen::Exit {
            screen = self.step(screen)?;
        }
        Ok(())
    }

    /// Handle one screen and return the next one.
    ///
    /// Only terminal I/O failures come back as `Err`; tool failures are
    /// reported to the user and the session carries on.
    pub fn step(&mut self, screen: Screen) -> Result<Screen> {
        let next = match screen {
            Screen::MainMenu => {
                writeln!(self.output, "{}", output::render_main_menu())?;
                match self.prompt("\n>> Select an Option (1-3): ")?.as_deref() {
                    None => Screen::Exit,
                    Some("1") => Screen::Download,
                    Some("2") => Screen::CompressionMenu,
                    Some("3") => {
                        writeln!(self.output, "Goodbye!")?;
                        Screen::Exit
                    }
                    Some(_) => {
                        writeln!(self.output, "Invalid choice.")?;
                        Screen::Pause
                    }
                }
            }
            Screen::Download => {
                if let Some(url) = self.read_link()? {
                    self.download_flow(&url, false)?;
                }
                Screen::Pause
            }
            Screen::CompressionMenu => {
                writeln!(self.output, "{}", output::render_compression_menu())?;
                match self.prompt("\n>> Select: ")?.as_deref() {
                    None => Screen::Exit,
                    Some("1") => Screen::RemoteCompress,
                    Some("2") => Screen::LocalCompress,
                    Some(_) => Screen::Pause,
                }
            }
            Screen::RemoteCompress => {
                if let Some(url) = self.read_link()? {
                    self.download_flow(&url, true)?;
                }
                Screen::Pause
            }
            Screen::LocalCompress => {
                self.compress_local()?;
                Screen::Pause
            }
            Screen::Pause => match self.prompt("\nPress Enter to continue...")? {
                None => Screen::Exit,
                Some(_) => Screen::MainMenu,
            },
            Screen::Exit => Screen::Exit,
        };
        Ok(next)
    }

    /// Print `text` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_link(&mut self) -> Result<Option<String>> {
        Ok(self.prompt("\n🔗 Paste Link: ")?.filter(|url| !url.is_empty()))
    }

    fn download_flow(&mut self, url: &str, compress: bool) -> Result<()> {
        if let Some(request) = self.choose_download(url, compress)? {
            self.run_job(request)?;
        }
        Ok(())
    }

    /// Analyse `url` and walk the user through quality and trim choices
    fn choose_download(&mut self, url: &str, compress: bool) -> Result<Option<JobRequest>> {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "🔍 Analyzing video metadata... please wait.")?;

        let info = match self.tools.fetch_info(url) {
            Ok(info) => info,
            Err(e) => {
                error!("Metadata fetch failed for {url}: {e:#}");
                writeln!(self.output, "Error fetching info: {e}")?;
                return Ok(None);
            }
        };

        writeln!(self.output, "{}", output::render_video_header(&info))?;
        let catalog = build_catalog(&info.formats, info.duration);
        writeln!(self.output, "{}", output::render_catalog(&catalog))?;

        let choice = match self.prompt("\nChoose Quality (Number): ")? {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(None),
        };
        let Some(option) = select_option(&catalog, &choice) else {
            writeln!(self.output, "Invalid selection.")?;
            return Ok(None);
        };
        info!("Selected {}p for {url}", option.height);

        let duration = seconds_to_clock(info.duration_secs());
        writeln!(self.output, "{}", output::render_trim_menu(&duration))?;
        let range = match self.prompt(">> Select Option (1 or 2): ")?.as_deref() {
            Some("2") => self.read_trim()?,
            _ => None,
        };

        Ok(Some(JobRequest::Remote {
            url: url.to_string(),
            height: Some(option.height),
            range,
            compress,
        }))
    }

    /// Ask for start and end; any unparseable timestamp means no trim at all
    fn read_trim(&mut self) -> Result<Option<TimeRange>> {
        writeln!(self.output, "\n✂️  Trim Mode")?;
        writeln!(self.output, "   Format: MM:SS (e.g., 1:30) or HH:MM:SS")?;
        let start_text = self.prompt("   Start Time: ")?.unwrap_or_default();
        let end_text = self.prompt("   End Time:   ")?.unwrap_or_default();

        match (clock_to_seconds(&start_text), clock_to_seconds(&end_text)) {
            (Ok(start), Ok(end)) => {
                writeln!(self.output, "✅ Cutting from {start_text} to {end_text}")?;
                Ok(Some(TimeRange { start, end }))
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Invalid trim range {start_text:?}..{end_text:?}: {e}");
                writeln!(self.output, "❌ Invalid time format. Downloading full video instead.")?;
                Ok(None)
            }
        }
    }

    fn compress_local(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "\n📂 Opening File Picker... (Check your taskbar if it doesn't pop up)"
        )?;
        let Some(input) = self.tools.pick_video_file() else {
            writeln!(self.output, "❌ No file selected. Returning to menu.")?;
            return Ok(());
        };
        writeln!(self.output, "✅ Selected: {}", input.display())?;
        self.run_job(JobRequest::Local { input })
    }

    fn run_job(&mut self, request: JobRequest) -> Result<()> {
        match JobPlan::from(request) {
            JobPlan::Download { url, job } => {
                writeln!(self.output, "\n⬇️  Processing...")?;
                if job.compress() {
                    writeln!(self.output, "⚡ Compression Enabled (CRF {CRF}).")?;
                }
                self.output.flush()?;
                match self.tools.download(&url, &job) {
                    Ok(()) => {
                        info!("Download complete: {url}");
                        writeln!(self.output, "\n✅ Process Complete!")?;
                    }
                    Err(e) => {
                        error!("Download failed for {url}: {e:#}");
                        writeln!(self.output, "Download error: {e}")?;
                    }
                }
            }
            JobPlan::Encode(job) => {
                writeln!(self.output, "⚡ Compressing... (This uses your PC's CPU)")?;
                self.output.flush()?;
                match self.tools.encode(&job) {
                    Ok(()) => {
                        info!("Compressed {} -> {}", job.input.display(), job.output.display());
                        writeln!(self.output, "\n✅ Done! Saved as: {}", job.output.display())?;
                    }
                    Err(e) => {
                        error!("Compression failed for {}: {e:#}", job.input.display());
                        writeln!(self.output, "\n❌ Compression Failed: {e}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Map a 1-based menu number onto the catalog
pub fn select_option<'a>(catalog: &'a [QualityOption], choice: &str) -> Option<&'a QualityOption> {
    let n: usize = choice.trim().parse().ok()?;
    n.checked_sub(1).and_then(|i| catalog.get(i))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::PathBuf;

    use eyre::bail;

    use super::*;
    use crate::estimate::BYTES_PER_MB;
    use crate::job::{DownloadJob, EncodeJob};
    use crate::ytdlp::{FormatDescriptor, VideoInfo};

    #[derive(Default)]
    struct FakeTools {
        info: Option<VideoInfo>,
        picked: Option<PathBuf>,
        fail_download: bool,
        fetched: RefCell<Vec<String>>,
        downloads: RefCell<Vec<(String, DownloadJob)>>,
        encodes: RefCell<Vec<EncodeJob>>,
    }

    impl Toolchain for FakeTools {
        fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
            self.fetched.borrow_mut().push(url.to_string());
            match &self.info {
                Some(info) => Ok(info.clone()),
                None => bail!("ERROR: Unsupported URL: {url}"),
            }
        }

        fn download(&self, url: &str, job: &DownloadJob) -> Result<()> {
            self.downloads.borrow_mut().push((url.to_string(), job.clone()));
            if self.fail_download {
                bail!("HTTP Error 403: Forbidden");
            }
            Ok(())
        }

        fn encode(&self, job: &EncodeJob) -> Result<()> {
            self.encodes.borrow_mut().push(job.clone());
            Ok(())
        }

        fn pick_video_file(&self) -> Option<PathBuf> {
            self.picked.clone()
        }
    }

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn sample_info() -> VideoInfo {
        let video = |height: u32, tbr: f64| FormatDescriptor {
            height: Some(height),
            vcodec: Some("avc1.64001f".to_string()),
            acodec: Some("none".to_string()),
            tbr: Some(tbr),
            ..Default::default()
        };
        VideoInfo {
            title: Some("Sample Clip".to_string()),
            duration: Some(600.0),
            formats: vec![
                FormatDescriptor {
                    vcodec: Some("none".to_string()),
                    acodec: Some("mp4a.40.2".to_string()),
                    abr: Some(128.0),
                    filesize: Some(9.0 * BYTES_PER_MB),
                    ..Default::default()
                },
                video(480, 800.0),
                video(720, 1500.0),
            ],
        }
    }

    fn run_script(tools: FakeTools, script: &str) -> (FakeTools, String) {
        let mut session = Session::new(tools, Cursor::new(script.to_string()), Vec::new());
        session.run().unwrap();
        let Session { tools, output, .. } = session;
        (tools, String::from_utf8(output).unwrap())
    }

    fn with_info() -> FakeTools {
        FakeTools {
            info: Some(sample_info()),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_download() {
        let (tools, out) = run_script(with_info(), &format!("1\n{URL}\n1\n1\n\n3\n"));

        assert!(out.contains("🎬 Title: Sample Clip"));
        assert!(out.contains("⏱️ Duration: 10:00"));
        assert!(out.contains("1. 720p (~"));
        assert!(out.contains("2. 480p (~"));
        assert!(out.contains("✅ Process Complete!"));
        assert!(out.ends_with("Goodbye!\n"));

        let downloads = tools.downloads.borrow();
        assert_eq!(downloads.len(), 1);
        let (url, job) = &downloads[0];
        assert_eq!(url, URL);
        assert_eq!(job.format, "bestvideo[height=720]+bestaudio/best[height=720]");
        assert_eq!(job.range, None);
        assert!(!job.compress());
    }

    #[test]
    fn test_trimmed_download() {
        let (tools, out) = run_script(with_info(), &format!("1\n{URL}\n2\n2\n1:00\n2:30\n\n3\n"));

        assert!(out.contains("✅ Cutting from 1:00 to 2:30"));
        let downloads = tools.downloads.borrow();
        let (_, job) = &downloads[0];
        assert_eq!(job.format, "bestvideo[height=480]+bestaudio/best[height=480]");
        assert_eq!(job.range, Some(TimeRange { start: 60, end: 150 }));
        assert!(job.force_keyframes_at_cuts);
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_full_video() {
        let (tools, out) = run_script(with_info(), &format!("1\n{URL}\n1\n2\nbad\n2:30\n\n3\n"));

        assert!(out.contains("Invalid time format. Downloading full video instead."));
        let downloads = tools.downloads.borrow();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].1.range, None);
        assert!(!downloads[0].1.force_keyframes_at_cuts);
    }

    #[test]
    fn test_invalid_quality_aborts_flow() {
        for choice in ["9", "0", "abc", "-1"] {
            let (tools, out) = run_script(with_info(), &format!("1\n{URL}\n{choice}\n\n3\n"));
            assert!(out.contains("Invalid selection."), "choice {choice:?}");
            assert!(tools.downloads.borrow().is_empty());
        }
    }

    #[test]
    fn test_empty_quality_aborts_silently() {
        let (tools, out) = run_script(with_info(), &format!("1\n{URL}\n\n\n3\n"));
        assert!(!out.contains("Invalid selection."));
        assert!(tools.downloads.borrow().is_empty());
    }

    #[test]
    fn test_empty_link_returns_to_menu() {
        let (tools, out) = run_script(with_info(), "1\n\n\n3\n");
        assert!(tools.fetched.borrow().is_empty());
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_metadata_failure_is_reported() {
        let (tools, out) = run_script(FakeTools::default(), "1\nnot a url\n\n3\n");
        assert!(out.contains("Error fetching info: ERROR: Unsupported URL: not a url"));
        assert_eq!(tools.fetched.borrow().len(), 1);
        assert!(tools.downloads.borrow().is_empty());
    }

    #[test]
    fn test_download_failure_keeps_menu_alive() {
        let tools = FakeTools {
            fail_download: true,
            ..with_info()
        };
        let (tools, out) = run_script(tools, &format!("1\n{URL}\n1\n1\n\n1\n{URL}\n1\n1\n\n3\n"));
        assert_eq!(out.matches("Download error: HTTP Error 403: Forbidden").count(), 2);
        assert_eq!(tools.downloads.borrow().len(), 2);
    }

    #[test]
    fn test_remote_download_with_compression() {
        let (tools, out) = run_script(with_info(), &format!("2\n1\n{URL}\n1\n1\n\n3\n"));

        assert!(out.contains("Compression Enabled (CRF 28)."));
        let downloads = tools.downloads.borrow();
        let (_, job) = &downloads[0];
        assert!(job.compress());
        assert!(job.to_args().contains(&"Merger:-c:v libx264 -crf 28 -preset fast -c:a aac -b:a 128k".to_string()));
    }

    #[test]
    fn test_local_compression() {
        let tools = FakeTools {
            picked: Some(PathBuf::from("/home/me/clip.mov")),
            ..Default::default()
        };
        let (tools, out) = run_script(tools, "2\n2\n\n3\n");

        assert!(out.contains("✅ Selected: /home/me/clip.mov"));
        assert!(out.contains("Saved as: /home/me/clip_compressed.mov"));
        let encodes = tools.encodes.borrow();
        assert_eq!(encodes.len(), 1);
        assert_eq!(encodes[0].output, PathBuf::from("/home/me/clip_compressed.mov"));
    }

    #[test]
    fn test_local_compression_cancelled() {
        let (tools, out) = run_script(FakeTools::default(), "2\n2\n\n3\n");
        assert!(out.contains("No file selected. Returning to menu."));
        assert!(tools.encodes.borrow().is_empty());
    }

    #[test]
    fn test_compression_menu_back() {
        let (tools, out) = run_script(with_info(), "2\n3\n\n3\n");
        assert!(out.contains("Compression Menu"));
        assert!(tools.fetched.borrow().is_empty());
    }

    #[test]
    fn test_invalid_main_choice() {
        let (_, out) = run_script(FakeTools::default(), "7\n\n3\n");
        assert!(out.contains("Invalid choice."));
        assert!(out.contains("Press Enter to continue..."));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_, out) = run_script(FakeTools::default(), "");
        assert!(out.contains("Select an Option"));
        assert!(!out.contains("Goodbye!"));

        let (tools, _) = run_script(with_info(), &format!("1\n{URL}\n1\n"));
        assert!(tools.downloads.borrow().len() == 1);
    }

    #[test]
    fn test_step_transitions() {
        let mut session = Session::new(FakeTools::default(), Cursor::new("2\n1\nx\n".to_string()), Vec::new());
        assert_eq!(session.step(Screen::MainMenu).unwrap(), Screen::CompressionMenu);
        assert_eq!(session.step(Screen::CompressionMenu).unwrap(), Screen::RemoteCompress);
        assert_eq!(session.step(Screen::Pause).unwrap(), Screen::MainMenu);
        assert_eq!(session.step(Screen::Pause).unwrap(), Screen::Exit);
        assert_eq!(session.step(Screen::Exit).unwrap(), Screen::Exit);
    }

    #[test]
    fn test_select_option() {
        let catalog = vec![
            QualityOption { height: 720, size_mb: 1.0 },
            QualityOption { height: 480, size_mb: 0.0 },
        ];
        assert_eq!(select_option(&catalog, "2").map(|o| o.height), Some(480));
        assert_eq!(select_option(&catalog, " 1 ").map(|o| o.height), Some(720));
        assert!(select_option(&catalog, "3").is_none());
        assert!(select_option(&catalog, "0").is_none());
        assert!(select_option(&[], "1").is_none());
    }
}
