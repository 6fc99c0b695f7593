#[cfg(test)]
mod cli_tests {
    use assert_cmd::Command;

    #[test]
    fn test_binary_reports_shared_session() {
        let output = Command::cargo_bin("singledb")
            .unwrap()
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("Connected to file:test?mode=memory&cache=shared"));
        assert!(stdout.contains("Second call returned the same handle"));
        assert!(stdout.contains("Connection attempts: 1"));
    }
}
