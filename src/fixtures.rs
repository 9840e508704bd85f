#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::types::Line;

    /// A deployed file: environment-specific values on lines 2, 3 and 6.
    pub const OLD_PROPERTIES: &str = "\
server.port=8080
db.host=old-db.internal
db.password=hunter2
feature.beta=false
log.level=INFO
secret.key=xyz
";

    /// The next release's file: new defaults, a new key, no `secret.key`.
    pub const NEW_PROPERTIES: &str = "\
server.port=9090
db.host=localhost
db.password=changeme
feature.beta=true
cache.ttl=300
";

    pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_bytes(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn lines(text: &str) -> Vec<Line> {
        text.lines().map(|l| l.as_bytes().to_vec()).collect()
    }
}
