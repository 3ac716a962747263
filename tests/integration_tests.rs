use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mkv_normalize::adapters::LocalFsAdapter;
use mkv_normalize::app::{AppContainer, DefaultAppContainer};
use mkv_normalize::domain::errors::DomainError;
use mkv_normalize::domain::model::*;
use mkv_normalize::ports::*;
use tempfile::TempDir;

/// Test utilities: a scripted stand-in for the external tools
mod test_utils {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Answers probes from canned text and creates the files the real tools
    /// would write.
    pub struct ScriptedTools {
        pub identify_verbose: ToolOutput,
        pub identify: ToolOutput,
        pub mkvinfo: ToolOutput,
        pub timecodes: String,
        /// Write invocations matching this exit with status 2
        pub fail_when: Option<fn(&ToolInvocation) -> bool>,
        /// Whether mkvmerge creates its `-o` file
        pub mux_writes_output: bool,
        calls: Mutex<Vec<ToolInvocation>>,
    }

    impl ScriptedTools {
        pub fn new() -> Self {
            Self {
                identify_verbose: ToolOutput::failure(2, "not scripted"),
                identify: ToolOutput::failure(2, "not scripted"),
                mkvinfo: ToolOutput::failure(2, "not scripted"),
                timecodes: String::new(),
                fail_when: None,
                mux_writes_output: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<ToolInvocation> {
            self.calls.lock().unwrap().clone()
        }

        pub fn writes(&self) -> Vec<ToolInvocation> {
            self.calls()
                .into_iter()
                .filter(|call| call.effect == ToolEffect::Write)
                .collect()
        }

        pub fn call_for(&self, tool: ToolKind, effect: ToolEffect) -> Option<ToolInvocation> {
            self.calls()
                .into_iter()
                .find(|call| call.tool == tool && call.effect == effect)
        }
    }

    fn destination(spec: &str) -> PathBuf {
        let (_, path) = spec.split_once(':').unwrap();
        PathBuf::from(path)
    }

    #[async_trait]
    impl ExecutePort for ScriptedTools {
        async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, DomainError> {
            self.calls.lock().unwrap().push(invocation.clone());
            let args = invocation.args_lossy();

            match (invocation.tool, invocation.effect) {
                (ToolKind::Mkvmerge, ToolEffect::Inspect) if args[0] == "--identify-verbose" => {
                    return Ok(self.identify_verbose.clone())
                }
                (ToolKind::Mkvmerge, ToolEffect::Inspect) => return Ok(self.identify.clone()),
                (ToolKind::Mkvinfo, _) => return Ok(self.mkvinfo.clone()),
                _ => {}
            }

            match invocation.tool {
                ToolKind::Mkvmerge if self.mux_writes_output => {
                    fs::write(&args[1], b"new container").unwrap();
                }
                ToolKind::Mkvextract if args[1] == "timestamps_v2" => {
                    fs::write(destination(&args[2]), &self.timecodes).unwrap();
                }
                ToolKind::Mkvextract => {
                    for spec in &args[2..] {
                        fs::write(destination(spec), b"elementary stream").unwrap();
                    }
                }
                ToolKind::Ffmpeg => {
                    fs::write(args.last().unwrap(), b"ac3 stream").unwrap();
                }
                _ => {}
            }

            if self.fail_when.map_or(false, |fails| fails(invocation)) {
                return Ok(ToolOutput::failure(2, "Error: simulated failure"));
            }
            Ok(ToolOutput::success(""))
        }
    }

    pub fn is_ffmpeg(call: &ToolInvocation) -> bool {
        call.tool == ToolKind::Ffmpeg
    }

    pub fn is_mux(call: &ToolInvocation) -> bool {
        call.tool == ToolKind::Mkvmerge && call.effect == ToolEffect::Write
    }

    pub fn is_track_extract(call: &ToolInvocation) -> bool {
        call.tool == ToolKind::Mkvextract && call.args_lossy()[1] == "tracks"
    }

    pub fn is_timestamp_export(call: &ToolInvocation) -> bool {
        call.tool == ToolKind::Mkvextract && call.args_lossy()[1] == "timestamps_v2"
    }

    /// Local filesystem with injectable rename and removal failures
    pub struct FaultyFs {
        inner: LocalFsAdapter,
        pub fail_rename: bool,
        /// Removing a file with this extension fails
        pub fail_remove_extension: Option<&'static str>,
    }

    impl FaultyFs {
        pub fn new() -> Self {
            Self {
                inner: LocalFsAdapter::new(),
                fail_rename: false,
                fail_remove_extension: None,
            }
        }
    }

    fn denied(path: &Path) -> DomainError {
        DomainError::Fs {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"),
        }
    }

    #[async_trait]
    impl FsPort for FaultyFs {
        async fn file_exists(&self, path: &Path) -> bool {
            self.inner.file_exists(path).await
        }

        async fn read_to_string(&self, path: &Path) -> Result<String, DomainError> {
            self.inner.read_to_string(path).await
        }

        async fn create_directory(&self, path: &Path) -> Result<(), DomainError> {
            self.inner.create_directory(path).await
        }

        async fn rename(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
            if self.fail_rename {
                return Err(denied(to));
            }
            self.inner.rename(from, to).await
        }

        async fn remove_file_if_exists(&self, path: &Path) -> Result<bool, DomainError> {
            let extension = path.extension().and_then(|ext| ext.to_str());
            if extension.is_some() && extension == self.fail_remove_extension {
                return Err(denied(path));
            }
            self.inner.remove_file_if_exists(path).await
        }
    }

    pub const IDENTIFY_DTS: &str = "\
File 'Movie.mkv': container: Matroska
Track ID 0: video (V_MPEG4/ISO/AVC)
Track ID 1: audio (A_DTS)
Track ID 2: subtitles (S_TEXT/UTF8)
";

    pub const IDENTIFY_AC3: &str = "\
File 'Movie.mkv': container: Matroska
Track ID 0: video (V_MPEG4/ISO/AVC)
Track ID 1: audio (A_DTS)
Track ID 2: audio (A_AC3)
";

    pub const MKVINFO_DTS: &str = "\
+ EBML head
+ Segment, size 123456
|+ Segment tracks
| + A track
|  + Track number: 1 (track ID for mkvmerge & mkvextract: 0)
|  + Track type: video
| + A track
|  + Track number: 2 (track ID for mkvmerge & mkvextract: 1)
|  + Track type: audio
|  + Codec ID: A_DTS
|  + Language: ger
|  + Name: DTS-HD MA 5.1
| + A track
|  + Track number: 3 (track ID for mkvmerge & mkvextract: 2)
|  + Language: eng
";

    pub const VERBOSE_MIXED: &str = "\
File 'Movie.mkv': container: Matroska [duration:7200000000000]
Track ID 0: video (V_MPEG4/ISO/AVC) [number:1 language:und default_track:1 forced_track:0]
Track ID 1: audio (A_DTS) [number:2 language:eng default_track:1 forced_track:0]
Track ID 2: audio (A_TRUEHD) [number:3 language:eng default_track:0 forced_track:0]
Track ID 3: audio (A_AC3) [number:4 language:ger default_track:0 forced_track:0]
Track ID 4: subtitles (S_TEXT/UTF8) [number:5 language:eng default_track:0 forced_track:0]
Track ID 5: subtitles (S_TEXT/UTF8) [number:6 language:ger default_track:1 forced_track:0]
";

    pub fn hash_file(path: &Path) -> u64 {
        let mut hasher = DefaultHasher::new();
        fs::read(path).unwrap().hash(&mut hasher);
        hasher.finish()
    }
}

use test_utils::*;

struct Fixture {
    dir: TempDir,
    movie: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let movie = dir.path().join("Movie.mkv");
        fs::write(&movie, b"original container bytes").unwrap();
        Self { dir, movie }
    }

    fn config(&self, dry_run: bool) -> NormalizeConfig {
        let mut config = NormalizeConfig::new(self.dir.path());
        config.dry_run = dry_run;
        config
    }

    fn container(&self, dry_run: bool, tools: &Arc<ScriptedTools>) -> DefaultAppContainer {
        self.container_with(self.config(dry_run), tools, LocalFsAdapter::new())
    }

    fn container_with(
        &self,
        config: NormalizeConfig,
        tools: &Arc<ScriptedTools>,
        fs_port: impl FsPort + 'static,
    ) -> DefaultAppContainer {
        DefaultAppContainer::with_ports(
            config,
            Arc::clone(tools) as Arc<dyn ExecutePort>,
            Arc::new(fs_port),
        )
    }

    /// Where the remuxed container is written, next to the source
    fn new_container(&self) -> PathBuf {
        self.dir.path().join("Movie.new.mkv")
    }

    fn temp_dir(&self) -> PathBuf {
        self.dir.path().join("tmp")
    }
}

fn convertible_tools() -> ScriptedTools {
    let mut tools = ScriptedTools::new();
    tools.identify = ToolOutput::success(IDENTIFY_DTS);
    tools.mkvinfo = ToolOutput::success(MKVINFO_DTS);
    tools.timecodes = "# timestamp format v2\n12\n54\n".to_string();
    tools
}

#[tokio::test]
async fn test_convert_replaces_original_and_removes_intermediates() {
    let fixture = Fixture::new();
    let tools = Arc::new(convertible_tools());
    let container = fixture.container(false, &tools);

    let outcome = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(outcome, FileOutcome::Succeeded { simulated: false });
    assert_eq!(fs::read(&fixture.movie).unwrap(), b"new container");
    for leftover in ["Movie.dts", "Movie.ac3", "Movie.tc"] {
        assert!(!fixture.temp_dir().join(leftover).exists(), "{} left behind", leftover);
    }
    assert!(!fixture.new_container().exists());

    let extract = tools.call_for(ToolKind::Mkvextract, ToolEffect::Write).unwrap();
    assert_eq!(extract.args_lossy()[1], "timestamps_v2");

    let ffmpeg = tools.call_for(ToolKind::Ffmpeg, ToolEffect::Write).unwrap();
    assert_eq!(
        &ffmpeg.args_lossy()[3..9],
        &["-acodec", "ac3", "-ac", "6", "-ab", "640k"]
    );

    let mux = tools.call_for(ToolKind::Mkvmerge, ToolEffect::Write).unwrap();
    let args = mux.args_lossy();
    let movie = fixture.movie.to_string_lossy().into_owned();
    let converted = fixture.temp_dir().join("Movie.ac3").to_string_lossy().into_owned();
    let output = fixture.new_container().to_string_lossy().into_owned();
    assert_eq!(
        args,
        vec![
            "-o",
            output.as_str(),
            "--no-audio",
            "--compression",
            "0:none",
            movie.as_str(),
            "--language",
            "0:ger",
            "--track-name",
            "0:AC3-HD MA 5.1",
            "--sync",
            "0:12",
            "--compression",
            "0:none",
            converted.as_str(),
        ]
    );
}

#[tokio::test]
async fn test_missing_replacement_leaves_original_byte_for_byte() {
    let fixture = Fixture::new();
    let before = hash_file(&fixture.movie);

    let mut scripted = convertible_tools();
    scripted.mux_writes_output = false;
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let err = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::ReplaceOriginal));
    assert!(matches!(
        err,
        DomainError::AtStage { ref source, .. } if matches!(**source, DomainError::ReplacementMissing(_))
    ));
    assert_eq!(hash_file(&fixture.movie), before);
}

#[tokio::test]
async fn test_tool_failure_aborts_at_its_stage() {
    let cases: [(fn(&ToolInvocation) -> bool, Stage); 4] = [
        (is_timestamp_export, Stage::CalculateDelay),
        (is_track_extract, Stage::ExtractAudio),
        (is_ffmpeg, Stage::ConvertAudio),
        (is_mux, Stage::Remux),
    ];
    for (fails, stage) in cases {
        let fixture = Fixture::new();
        let before = hash_file(&fixture.movie);

        let mut scripted = convertible_tools();
        scripted.fail_when = Some(fails);
        let tools = Arc::new(scripted);
        let container = fixture.container(false, &tools);

        let err = container
            .convert_interactor()
            .convert_file(&fixture.movie)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(stage));
        assert_eq!(hash_file(&fixture.movie), before);
        // intermediates are still removed after a failure
        assert!(!fixture.temp_dir().join("Movie.dts").exists());
        assert!(!fixture.temp_dir().join("Movie.tc").exists());
        assert!(!fixture.new_container().exists());
    }
}

#[tokio::test]
async fn test_track_extract_failure_stops_before_conversion() {
    let fixture = Fixture::new();
    let mut scripted = convertible_tools();
    scripted.fail_when = Some(is_track_extract);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let err = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::ExtractAudio));
    assert!(tools.call_for(ToolKind::Ffmpeg, ToolEffect::Write).is_none());
    assert!(tools.call_for(ToolKind::Mkvmerge, ToolEffect::Write).is_none());
}

#[tokio::test]
async fn test_cleanup_failure_after_replace_is_reported_at_cleanup() {
    let fixture = Fixture::new();
    let tools = Arc::new(convertible_tools());
    let mut fs_port = FaultyFs::new();
    fs_port.fail_remove_extension = Some("tc");
    let container = fixture.container_with(fixture.config(false), &tools, fs_port);

    let err = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Cleanup));
    // the completed replace is not reverted
    assert_eq!(fs::read(&fixture.movie).unwrap(), b"new container");
    // the remaining removals are still attempted
    assert!(!fixture.temp_dir().join("Movie.dts").exists());
    assert!(!fixture.temp_dir().join("Movie.ac3").exists());
    assert!(fixture.temp_dir().join("Movie.tc").exists());
}

#[tokio::test]
async fn test_separate_temp_directory_keeps_remux_beside_source() {
    let fixture = Fixture::new();
    // tmpfs when available, so the intermediates live on another filesystem
    let scratch = if Path::new("/dev/shm").is_dir() {
        tempfile::tempdir_in("/dev/shm")
    } else {
        tempfile::tempdir()
    }
    .unwrap();
    let mut config = fixture.config(false);
    config.transcode.temp_directory = Some(scratch.path().join("work"));

    let tools = Arc::new(convertible_tools());
    let container = fixture.container_with(config, &tools, LocalFsAdapter::new());

    let outcome = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(outcome, FileOutcome::Succeeded { simulated: false });
    assert_eq!(fs::read(&fixture.movie).unwrap(), b"new container");
    assert!(!fixture.new_container().exists());

    let mux = tools.call_for(ToolKind::Mkvmerge, ToolEffect::Write).unwrap();
    let output = PathBuf::from(&mux.args_lossy()[1]);
    assert_eq!(output.parent(), fixture.movie.parent());

    let ffmpeg = tools.call_for(ToolKind::Ffmpeg, ToolEffect::Write).unwrap();
    let converted = PathBuf::from(ffmpeg.args_lossy().last().unwrap());
    assert!(converted.starts_with(scratch.path()));
    assert!(!converted.exists());
}

#[tokio::test]
async fn test_already_converted_is_a_no_op_on_every_run() {
    let fixture = Fixture::new();
    let mut scripted = ScriptedTools::new();
    scripted.identify = ToolOutput::success(IDENTIFY_AC3);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    for _ in 0..2 {
        let outcome = container
            .convert_interactor()
            .convert_file(&fixture.movie)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::skipped(SkipReason::AlreadyConverted));
    }
    assert!(tools.writes().is_empty());
    assert_eq!(tools.calls().len(), 2);
}

#[tokio::test]
async fn test_probe_failure_skips_without_temp_files() {
    let fixture = Fixture::new();
    let tools = Arc::new(ScriptedTools::new());
    let container = fixture.container(false, &tools);

    let outcome = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(outcome, FileOutcome::skipped(SkipReason::NotValidContainer));
    assert_eq!(tools.calls().len(), 1);
    assert!(!fixture.temp_dir().exists());
}

#[tokio::test]
async fn test_no_convertible_source_is_skipped() {
    let fixture = Fixture::new();
    let mut scripted = ScriptedTools::new();
    scripted.identify = ToolOutput::success(
        "Track ID 0: video (V_MPEG4/ISO/AVC)\nTrack ID 1: audio (A_AAC)\n",
    );
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let outcome = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap();
    assert_eq!(outcome, FileOutcome::skipped(SkipReason::NoConvertibleSource));
}

#[tokio::test]
async fn test_dry_run_only_inspects() {
    let fixture = Fixture::new();
    let before = hash_file(&fixture.movie);
    let tools = Arc::new(convertible_tools());
    let container = fixture.container(true, &tools);

    let outcome = container
        .convert_interactor()
        .convert_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(outcome, FileOutcome::Succeeded { simulated: true });
    assert!(tools.writes().is_empty());
    let inspected: Vec<ToolKind> = tools.calls().iter().map(|call| call.tool).collect();
    assert_eq!(inspected, vec![ToolKind::Mkvmerge, ToolKind::Mkvinfo]);
    assert_eq!(hash_file(&fixture.movie), before);
    assert!(!fixture.temp_dir().exists());
}

#[tokio::test]
async fn test_clean_keeps_best_target_language_tracks() {
    let fixture = Fixture::new();
    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(VERBOSE_MIXED);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let outcome = container
        .clean_interactor()
        .clean_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(outcome, FileOutcome::Succeeded { simulated: false });
    assert_eq!(fs::read(&fixture.movie).unwrap(), b"new container");
    assert!(!fixture.dir.path().join("Movie.mkv.temp").exists());

    let mux = tools.call_for(ToolKind::Mkvmerge, ToolEffect::Write).unwrap();
    let movie = fixture.movie.to_string_lossy().into_owned();
    let temp = format!("{}.temp", movie);
    assert_eq!(
        mux.args_lossy(),
        vec![
            "-o",
            temp.as_str(),
            "--audio-tracks",
            "2",
            "--subtitle-tracks",
            "4",
            "--default-track",
            "2:1",
            "--default-track",
            "4:0",
            movie.as_str(),
        ]
    );
}

#[tokio::test]
async fn test_clean_mux_failure_removes_partial_output() {
    let fixture = Fixture::new();
    let before = hash_file(&fixture.movie);
    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(VERBOSE_MIXED);
    scripted.fail_when = Some(is_mux);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let err = container
        .clean_interactor()
        .clean_file(&fixture.movie)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Remux));
    assert!(!fixture.dir.path().join("Movie.mkv.temp").exists());
    assert_eq!(hash_file(&fixture.movie), before);
}

#[tokio::test]
async fn test_clean_rename_failure_removes_finished_output() {
    let fixture = Fixture::new();
    let before = hash_file(&fixture.movie);
    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(VERBOSE_MIXED);
    let tools = Arc::new(scripted);
    let mut fs_port = FaultyFs::new();
    fs_port.fail_rename = true;
    let container = fixture.container_with(fixture.config(false), &tools, fs_port);

    let err = container
        .clean_interactor()
        .clean_file(&fixture.movie)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::ReplaceOriginal));
    assert!(!fixture.dir.path().join("Movie.mkv.temp").exists());
    assert_eq!(hash_file(&fixture.movie), before);
}

#[tokio::test]
async fn test_clean_skips_single_language_and_missing_language() {
    let fixture = Fixture::new();
    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(
        "Track ID 0: video (V_MPEG4/ISO/AVC) [language:und]\n\
         Track ID 1: audio (A_DTS) [language:ger default_track:1]\n\
         Track ID 2: subtitles (S_TEXT/UTF8) [language:ger]\n",
    );
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);
    let outcome = container
        .clean_interactor()
        .clean_file(&fixture.movie)
        .await
        .unwrap();
    assert_eq!(outcome, FileOutcome::skipped(SkipReason::AlreadySingleLanguage));

    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(
        "Track ID 1: audio (A_DTS) [language:ger]\n\
         Track ID 2: audio (A_AC3) [language:fre]\n\
         Track ID 3: subtitles (S_TEXT/UTF8) [language:eng]\n",
    );
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);
    let outcome = container
        .clean_interactor()
        .clean_file(&fixture.movie)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        FileOutcome::skipped(SkipReason::LanguageNotPresent(LanguageCode::parse("eng").unwrap()))
    );
    assert!(tools.writes().is_empty());
}

#[tokio::test]
async fn test_inspect_reports_plan_without_writing() {
    let fixture = Fixture::new();
    let mut scripted = ScriptedTools::new();
    scripted.identify_verbose = ToolOutput::success(VERBOSE_MIXED);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let response = container
        .inspect_interactor()
        .inspect_file(&fixture.movie)
        .await
        .unwrap();

    assert_eq!(response.tracks.len(), 6);
    assert!(response.mux_command.unwrap().contains("--audio-tracks 2"));
    assert_eq!(response.conversion_source, None);
    assert!(response.already_converted);
    assert!(tools.writes().is_empty());
}

#[tokio::test]
async fn test_inspect_probe_failure_is_an_error() {
    let fixture = Fixture::new();
    let tools = Arc::new(ScriptedTools::new());
    let container = fixture.container(false, &tools);

    let err = container
        .inspect_interactor()
        .inspect_file(&fixture.movie)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ProbeFailure { code: Some(2), .. }));
}

#[tokio::test]
async fn test_batch_isolates_failures_and_reports_every_file() {
    let fixture = Fixture::new();
    fs::write(fixture.dir.path().join("Other.mkv"), b"other").unwrap();
    fs::write(fixture.dir.path().join("notes.txt"), b"ignored").unwrap();

    let mut scripted = convertible_tools();
    scripted.fail_when = Some(is_ffmpeg);
    let tools = Arc::new(scripted);
    let container = fixture.container(false, &tools);

    let report = container
        .orchestrator()
        .run(container.convert_interactor().as_ref())
        .await
        .unwrap();

    assert_eq!(report.command, "convert");
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.failed(), 2);
    for file in &report.files {
        assert!(matches!(
            file.outcome,
            FileOutcome::Failed { stage: Some(Stage::ConvertAudio), .. }
        ));
    }
    assert!(report.summary_line().starts_with("Total processing time: "));
}
