//! End-to-end tests against a real `slim` binary. Each test returns early
//! when the engine is not installed, mirroring how the suite behaves on
//! machines without the external tool.

use std::io::Write;
use std::process::Command;

use anyhow::Result;
use slimwrap::{Config, Constants, Matrix, Model, RunOptions};

const MINIMAL_VALID_SCRIPT: &str = r#"
initialize() {
    initializeMutationRate(1e-7);
    initializeMutationType("m1", 0.5, "f", 0.0);
    initializeGenomicElementType("g1", m1, 1.0);
    initializeGenomicElement(g1, 0, 99999);
    initializeRecombinationRate(1e-8);
}
1 early() {
    sim.addSubpop("p1", 500);
}
2000 late() { sim.outputFixedMutations(); }
"#;

const MINIMAL_INVALID_SCRIPT: &str = r#"
initialize() {initializeMutationRate(
1 early() {sim.addSubpop("p1", 500);}
2000 late() { sim.outputFixedMutations(); }
"#;

fn slim_available() -> bool {
    Command::new("slim").arg("-v").output().is_ok()
}

#[test]
fn model_from_file() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let mut script = tempfile::NamedTempFile::new()?;
    script.write_all(MINIMAL_VALID_SCRIPT.as_bytes())?;
    script.flush()?;

    let cfg = Config::load();
    let model = Model::from_file(&cfg, script.path())?;
    assert_eq!(model.source(), MINIMAL_VALID_SCRIPT);
    Ok(())
}

#[test]
fn model_from_code() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let cfg = Config::load();
    Model::from_code(&cfg, MINIMAL_VALID_SCRIPT)?;
    Ok(())
}

#[test]
fn invalid_script_fails_construction() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let cfg = Config::load();
    let err = Model::from_code(&cfg, MINIMAL_INVALID_SCRIPT).unwrap_err();
    assert!(err.to_string().contains("SLiM model check failed"));

    let mut script = tempfile::NamedTempFile::new()?;
    script.write_all(MINIMAL_INVALID_SCRIPT.as_bytes())?;
    script.flush()?;
    assert!(Model::from_file(&cfg, script.path()).is_err());
    Ok(())
}

#[test]
fn run_model() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let cfg = Config::load();
    let mut model = Model::from_code(&cfg, MINIMAL_VALID_SCRIPT)?;

    let out = model.run(RunOptions::default())?;
    assert!(out.success());
    assert!(model.last_seed().is_some());

    model.run(RunOptions { seed: Some(1000), ..Default::default() })?;
    assert_eq!(model.last_seed(), Some(1000));

    let mut constants = Constants::new();
    constants.insert("A".into(), (1e-8).into());
    model.run(RunOptions { constants, ..Default::default() })?;
    Ok(())
}

#[test]
fn same_seed_reproduces_output() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let cfg = Config::load();
    let mut model = Model::from_code(&cfg, MINIMAL_VALID_SCRIPT)?;

    let first = model.run(RunOptions { seed: Some(42), ..Default::default() })?;
    let second = model.run(RunOptions { seed: Some(42), ..Default::default() })?;
    assert_eq!(first.status, second.status);
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn failing_run_respects_check_flag() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let cfg = Config::load();
    let mut model = Model::from_code(
        &cfg,
        r#"
initialize() {
    initializeMutationRate(1e-7);
    initializeMutationType("m1", 0.5, "f", 0.0);
    initializeGenomicElementType("g1", m1, 1.0);
    initializeGenomicElement(g1, 0, 99999);
    initializeRecombinationRate(1e-8);
}
1 early() { stop("deliberate failure"); }
"#,
    )?;

    let err = model.run(RunOptions::default()).unwrap_err();
    assert!(err.to_string().contains("SLiM run failed"));

    let out = model.run(RunOptions { check: false, ..Default::default() })?;
    assert!(!out.success());
    Ok(())
}

// Constants are verified inside the engine itself: the script asserts each
// injected value, so a wrong type tag or a reshuffled matrix fails the run.
#[test]
fn constants_are_defined_inside_the_engine() -> Result<()> {
    if !slim_available() {
        println!("slim not found, skipping");
        return Ok(());
    }
    let script = r#"
initialize() {
    initializeMutationRate(1e-7);
    initializeMutationType("m1", 0.5, "f", 0.0);
    initializeGenomicElementType("g1", m1, 1.0);
    initializeGenomicElement(g1, 0, 99999);
    initializeRecombinationRate(1e-8);
}
1 early() {
    assert(twoFloat==2.0);
    assert(twoInt==2);
    assert(yes==T);
    assert(no==F);
    assert(all(bool_vector==c(T, F, T)));
    assert(sum(float_vector - c(2.3, 1.1, 1.0)) < 1e-10);
    assert(sum(int_vector - c(1, 2, 3)) < 1e-10);
    assert(all(str_vector==c("1", "True", "aa")));
    assert(all(mat[0, 0] == 1));
    assert(all(mat[0, 1] == 2));
    assert(all(mat[1, 0] == 3));
    assert(all(mat[1, 1] == 4));
}
"#;

    let cfg = Config::load();
    let mut model = Model::from_code(&cfg, script)?;

    let mut constants = Constants::new();
    constants.insert("twoFloat".into(), (2.0).into());
    constants.insert("twoInt".into(), 2.into());
    constants.insert("yes".into(), true.into());
    constants.insert("no".into(), false.into());
    constants.insert("bool_vector".into(), vec![true, false, true].into());
    constants.insert("float_vector".into(), vec![2.3, 1.1, 1.0].into());
    constants.insert("int_vector".into(), vec![1, 2, 3].into());
    constants.insert("str_vector".into(), vec!["1", "True", "aa"].into());
    constants.insert("mat".into(), Matrix::from_rows(vec![vec![1, 2], vec![3, 4]])?.into());

    let out = model.run(RunOptions { constants, ..Default::default() })?;
    assert!(out.success(), "engine-side asserts failed:\n{}", out.stderr);
    Ok(())
}
