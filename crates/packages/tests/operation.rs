use std::{
    io::IsTerminal,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use packages::{
    Action, Answer, Error, InstalledPackage, PackageEvent, PackageManager, PackageOperation,
    list_installed,
};
use tracing_subscriber::EnvFilter;

/// Package manager stand-in which echoes its arguments and asks for confirmation
const CONFIRMING_MANAGER: &str = r#"
echo "$1 $2"
printf 'Proceed (Y/n)? '
read answer
echo "answer=$answer"
"#;

/// Writes its prompt in two pieces so it arrives in separate reads
const SLOW_PROMPT_MANAGER: &str = r#"
echo "$1 $2"
printf 'Proceed (Y'
sleep 0.2
printf '/n)? '
read answer
echo "answer=$answer"
"#;

const LISTING_MANAGER: &str = r#"
echo "Package    Version"
echo "---------- -------"
echo "foo        1.2.3"
echo "bar        4.5.6"
"#;

fn fake_manager(dir: &Path, script: &str) -> PackageManager {
    let path = dir.join("manager.sh");
    std::fs::write(&path, script).unwrap();
    PackageManager::new("sh").with_args([path.display().to_string()])
}

fn wait_for(
    operation: &mut PackageOperation,
    sink: &mut String,
    pred: impl Fn(&PackageEvent) -> bool,
) -> PackageEvent {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(event) = operation.poll(sink).into_iter().find(|e| pred(e)) {
            return event;
        }
        assert!(Instant::now() < deadline, "timed out waiting for event");
        thread::sleep(Duration::from_millis(10));
    }
}

fn is_prompt(event: &PackageEvent) -> bool {
    matches!(event, PackageEvent::Prompt(_))
}

fn is_finished(event: &PackageEvent) -> bool {
    matches!(event, PackageEvent::Finished { .. })
}

#[test]
fn confirmed_install() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), CONFIRMING_MANAGER);
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Install, " requests ")?;
    assert_eq!(operation.name(), "requests");

    let prompt = wait_for(&mut operation, &mut sink, is_prompt);
    assert_eq!(prompt, PackageEvent::Prompt("Proceed (Y/n)?".to_string()));
    assert!(operation.is_awaiting_answer());

    assert_eq!(operation.respond("Y", &mut sink)?, Answer::Yes);
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: true });

    assert!(sink.contains("install requests"));
    assert!(sink.contains("answer=y"));
    Ok(())
}

#[test]
fn prompt_split_across_reads() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), SLOW_PROMPT_MANAGER);
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Install, "requests")?;
    let prompt = wait_for(&mut operation, &mut sink, is_prompt);
    assert_eq!(prompt, PackageEvent::Prompt("Proceed (Y/n)?".to_string()));

    assert_eq!(operation.respond("y", &mut sink)?, Answer::Yes);
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: true });
    assert!(sink.contains("answer=y"));
    Ok(())
}

#[test]
fn declined_uninstall() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), CONFIRMING_MANAGER);
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Uninstall, "requests")?;
    wait_for(&mut operation, &mut sink, is_prompt);

    assert_eq!(operation.respond("n", &mut sink)?, Answer::No);
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: false });
    assert!(sink.contains("uninstall requests"));
    assert!(sink.contains("Operation cancelled"));
    assert!(!sink.contains("answer="));
    Ok(())
}

#[test]
fn invalid_answer_terminates() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), CONFIRMING_MANAGER);
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Install, "requests")?;
    wait_for(&mut operation, &mut sink, is_prompt);

    let answer = operation.respond("maybe", &mut sink)?;
    assert_eq!(answer, Answer::Invalid("maybe".to_string()));
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: false });
    assert!(sink.contains("Command terminated.\nResponse is maybe"));
    Ok(())
}

#[test]
fn empty_name_starts_nothing() {
    let manager = PackageManager::new("/definitely/not/a/package/manager");
    let result = PackageOperation::start(&manager, Action::Install, "   ");
    assert!(matches!(result, Err(Error::EmptyPackageName)));
}

#[test]
fn answer_without_prompt_is_rejected() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), "echo done");
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Install, "foo")?;
    assert!(matches!(
        operation.respond("y", &mut sink),
        Err(Error::NoPendingPrompt)
    ));
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: true });
    Ok(())
}

#[test]
fn missing_package_manager_fails() -> eyre::Result<()> {
    let manager = PackageManager::new("/definitely/not/a/package/manager");
    let mut sink = String::new();

    let mut operation = PackageOperation::start(&manager, Action::Install, "foo")?;
    let finished = wait_for(&mut operation, &mut sink, is_finished);
    assert_eq!(finished, PackageEvent::Finished { success: false });
    assert!(sink.contains("failed to start"));
    Ok(())
}

#[test]
fn lists_packages_in_the_background() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), LISTING_MANAGER);

    let packages = list_installed(&manager).recv_timeout(Duration::from_secs(10))??;
    assert_eq!(
        packages,
        vec![
            InstalledPackage {
                name: "foo".to_string(),
                version: "1.2.3".to_string(),
            },
            InstalledPackage {
                name: "bar".to_string(),
                version: "4.5.6".to_string(),
            },
        ]
    );
    Ok(())
}

#[test]
fn failing_list_is_reported() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = fake_manager(dir.path(), "echo boom >&2; exit 2");

    let result = list_installed(&manager).recv_timeout(Duration::from_secs(10))?;
    match result {
        Err(Error::ListFailed { status, stderr }) => {
            assert_eq!(status, Some(2));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected list failure, got {other:?}"),
    }
    Ok(())
}

// test suite "constructor"
#[ctor::ctor]
fn init() {
    let in_ci = std::env::var("CI")
        .map(|val| val == "true")
        .unwrap_or(false);

    if std::io::stderr().is_terminal() || in_ci {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .json()
            .try_init();
    }

    // error traces
    let _ = color_eyre::install();
}
