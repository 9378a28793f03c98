// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use eyre::Result;
use pajetrace::{Job, Labels, Profile, Task, ThreadLink, TimerEvent, TraceExporter};
use rstest::{fixture, rstest};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

struct TestSetup {
    _temp_dir: TempDir,
    profile_path: PathBuf,
    config_path: PathBuf,
    output_path: PathBuf,
}

impl TestSetup {
    fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let profile_path = temp_dir.path().join("profile.json");
        let config_path = temp_dir.path().join("config.toml");
        let output_path = temp_dir.path().join("trace.paje");
        Ok(TestSetup {
            _temp_dir: temp_dir,
            profile_path,
            config_path,
            output_path,
        })
    }
}

#[fixture]
fn setup() -> TestSetup {
    TestSetup::new().expect("failed to create test setup")
}

/// Two threads working for one job, with a handoff from thread 0 to thread 1.
#[fixture]
fn handoff_profile() -> Profile {
    Profile::builder()
        .nthreads(2)
        .jobs(vec![Job::new("K", 0.0, 5.0)])
        .tasks(vec![
            vec![Task::new(0, 0, 0.5, 2.0).with_job(0)],
            vec![Task::new(1, 1, 2.5, 4.5).with_job(0)],
        ])
        .links(vec![
            vec![ThreadLink::start(0, 42, 1.0)],
            vec![ThreadLink::end(1, 42, 3.0)],
        ])
        .build()
}

fn data_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.starts_with('%'))
        .collect()
}

fn count_code(lines: &[&str], code: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.split('\t').next() == Some(code))
        .count()
}

/// Alias of the container created with `name`.
fn container_alias<'a>(lines: &[&'a str], name: &str) -> &'a str {
    let quoted = format!("\"{name}\"");
    lines
        .iter()
        .find(|line| line.starts_with("6\t") && line.ends_with(&quoted))
        .and_then(|line| line.split('\t').nth(2))
        .expect("container defined")
}

#[rstest]
fn test_export_handoff(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    let summary = TraceExporter::new(&handoff_profile).export_to_path(&setup.output_path)?;
    let content = fs::read_to_string(&setup.output_path)?;
    assert!(content.starts_with(paje_format::HEADER));
    let lines = data_lines(&content);

    assert_eq!(summary.lines_written, lines.len() as u64);
    assert_eq!(summary.links, 1);
    assert_eq!(summary.unmatched_links, 0);
    assert_eq!(summary.timer_depth, 0);

    assert_eq!(count_code(&lines, "0"), 4);
    assert_eq!(count_code(&lines, "1"), 1);
    assert_eq!(count_code(&lines, "2"), 3);
    assert_eq!(count_code(&lines, "4"), 1);

    let kind_values: Vec<&&str> = lines
        .iter()
        .filter(|line| line.starts_with("5\t") && line.contains("\t\"K\"\t"))
        .collect();
    assert_eq!(kind_values.len(), 2);

    // one job pair plus one pair per task
    assert_eq!(count_code(&lines, "12"), 3);
    assert_eq!(count_code(&lines, "13"), 3);
    assert_eq!(count_code(&lines, "8"), 1);
    assert_eq!(count_code(&lines, "9"), 2);
    assert_eq!(count_code(&lines, "10"), 2);

    let thread0 = container_alias(&lines, "Thread 0");
    let thread1 = container_alias(&lines, "Thread 1");
    let starts: Vec<&&str> = lines.iter().filter(|l| l.starts_with("15\t")).collect();
    let ends: Vec<&&str> = lines.iter().filter(|l| l.starts_with("16\t")).collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(ends.len(), 1);
    let start: Vec<&str> = starts[0].split('\t').collect();
    let end: Vec<&str> = ends[0].split('\t').collect();
    assert_eq!((start[1], start[4], start[5], start[6]), ("1000", "42", thread0, "42"));
    assert_eq!((end[1], end[4], end[5], end[6]), ("3000", "42", thread1, "42"));

    Ok(())
}

#[rstest]
fn test_timestamps_are_milliseconds(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    TraceExporter::new(&handoff_profile).export_to_path(&setup.output_path)?;
    let content = fs::read_to_string(&setup.output_path)?;
    let lines = data_lines(&content);

    let thread0 = container_alias(&lines, "Thread 0");
    let task_push = lines
        .iter()
        .find(|line| line.starts_with("12\t") && line.split('\t').nth(3) == Some(thread0))
        .expect("task push on thread 0");
    assert_eq!(task_push.split('\t').nth(1), Some("500"));

    let job_pop = lines
        .iter()
        .filter(|line| line.starts_with("13\t"))
        .last()
        .expect("job pop");
    assert_eq!(job_pop.split('\t').nth(1), Some("5000"));
    Ok(())
}

#[rstest]
fn test_aliases_are_unique(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    let profile = Profile {
        timer_events: vec![
            TimerEvent::start(7, 0.0),
            TimerEvent::start(3, 1.0),
            TimerEvent::stop(3, 2.0),
            TimerEvent::stop(7, 3.0),
        ],
        ..handoff_profile
    };
    TraceExporter::new(&profile).export_to_path(&setup.output_path)?;
    let content = fs::read_to_string(&setup.output_path)?;
    let lines = data_lines(&content);

    let mut defined: Vec<u32> = lines
        .iter()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let alias = match fields.next()? {
                "0" | "1" | "2" | "4" | "5" => fields.next()?,
                "6" => fields.nth(1)?,
                _ => return None,
            };
            alias.strip_prefix('a')?.parse().ok()
        })
        .collect();
    let total = defined.len();
    defined.sort_unstable();
    defined.dedup();
    assert_eq!(defined.len(), total);
    assert_eq!(defined, (1..=total as u32).collect::<Vec<_>>());
    Ok(())
}

#[rstest]
fn test_profile_json_roundtrip(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    fs::write(&setup.profile_path, serde_json::to_string(&handoff_profile)?)?;
    let loaded = Profile::load(&setup.profile_path)?;
    assert_eq!(loaded, handoff_profile);
    Ok(())
}

#[rstest]
fn test_custom_labels(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    let labels = Labels {
        root_container: "Solver".to_string(),
        link_type: "handoffs".to_string(),
        ..Labels::default()
    };
    TraceExporter::new(&handoff_profile)
        .with_labels(labels)
        .export_to_path(&setup.output_path)?;
    let content = fs::read_to_string(&setup.output_path)?;
    assert!(content.contains("\t\"Solver\"\n"));
    assert!(content.contains("\t\"handoffs\"\n"));
    assert!(!content.contains("\"The task manager\""));
    Ok(())
}

#[rstest]
fn test_cli_export(setup: TestSetup, handoff_profile: Profile) -> Result<()> {
    fs::write(&setup.profile_path, serde_json::to_string(&handoff_profile)?)?;
    fs::write(
        &setup.config_path,
        r#"
log_filter = "warn"

[labels]
thread_prefix = "Worker"
"#,
    )?;

    let status = Command::new(env!("CARGO_BIN_EXE_pajetrace"))
        .arg(&setup.profile_path)
        .arg("--output")
        .arg(&setup.output_path)
        .arg("--config")
        .arg(&setup.config_path)
        .status()?;
    assert!(status.success());

    let content = fs::read_to_string(&setup.output_path)?;
    let lines = data_lines(&content);
    assert!(lines.iter().any(|line| line.ends_with("\"Worker 1\"")));
    assert_eq!(count_code(&lines, "15"), 1);
    assert_eq!(count_code(&lines, "16"), 1);
    Ok(())
}

#[rstest]
fn test_cli_rejects_missing_profile(setup: TestSetup) -> Result<()> {
    let status = Command::new(env!("CARGO_BIN_EXE_pajetrace"))
        .arg(&setup.profile_path)
        .arg("--output")
        .arg(&setup.output_path)
        .status()?;
    assert!(!status.success());
    assert!(!setup.output_path.exists());
    Ok(())
}
