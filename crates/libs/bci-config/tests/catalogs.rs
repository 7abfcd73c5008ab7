use std::{error::Error, path::PathBuf};

use bci_config::{BoardCatalog, BuildConfig, Settings, TestBinding, TestCatalog};

fn workspace_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../..").join(name)
}

#[test]
fn test_boards_from_file() -> Result<(), Box<dyn Error>> {
    let catalog = BoardCatalog::from_file(&workspace_file("boards.toml"))?;
    assert_eq!(catalog.len(), 4);

    let alpine = catalog.get("alpine-v2-evp")?;
    assert_eq!(alpine.name, "alpine-v2-evp");
    assert_eq!(alpine.device_type, "alpine-v2-evp");
    assert_eq!(alpine.dt, "al/alpine-v2-evp");
    assert_eq!(alpine.default_tests(), vec![TestBinding::bare("boot")]);

    let armada = catalog.get("armada-370-db")?;
    let crypto = armada.binding("crypto").ok_or("no crypto binding")?;
    assert_eq!(
        crypto.configs,
        vec![BuildConfig::new(
            "mvebu-backports",
            "4.12-rc6_backports",
            "mvebu_v7_defconfig"
        )]
    );
    assert_eq!(armada.notify, vec!["maintainer@example.com"]);

    let bone = catalog.get("beaglebone-black")?;
    assert_eq!(bone.name, "BeagleBone Black");
    assert_eq!(bone.test_plan, "boot-nfs");
    assert!(bone.notify.is_empty());
    Ok(())
}

#[test]
fn test_tests_from_file() -> Result<(), Box<dyn Error>> {
    let catalog = TestCatalog::from_file(&workspace_file("tests.toml"))?;
    assert_eq!(catalog.get("crypto").and_then(|test| test.timeout), Some(20));
    assert_eq!(catalog.get("network").and_then(|test| test.template.clone()), None);
    assert!(!catalog.contains("sata"));
    Ok(())
}

#[test]
fn test_example_settings() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_file(&workspace_file("bcirc.example.toml"))?;
    settings.validate_ci(true)?;
    settings.validate_custom(true, true)?;
    assert_eq!(settings.ssh.port, 22);
    assert_eq!(settings.web_ui_address(), Some("https://lava.example.com"));
    Ok(())
}
