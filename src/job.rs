use rand::TryRngCore;
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};

/// Number of hex characters in a job id.
pub const JOB_ID_LEN: usize = 8;

/// Generates a random lowercase hex id of `len` characters from the OS RNG.
pub fn generate_id(len: usize) -> std::io::Result<String> {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(std::io::Error::other)?;
    let mut id = hex::encode(bytes);
    id.truncate(len);
    Ok(id)
}

/// One recognition request's unit of work.
#[derive(Clone, Debug)]
pub struct Job {
    pub id: String,
    /// Created by [`Job::allocate`]; owned by this job only.
    pub input_dir: PathBuf,
    /// Populated by the recognition service, never created here.
    pub output_dir: PathBuf,
}

impl Job {
    /// Allocates a fresh id and creates its input directory.
    pub async fn allocate(input_root: &Path, output_root: &Path) -> std::io::Result<Self> {
        let id = generate_id(JOB_ID_LEN)?;
        Self::create(id, input_root, output_root).await
    }

    /// Creates the input directory for `id`. Fails if it already exists.
    pub async fn create(
        id: String,
        input_root: &Path,
        output_root: &Path,
    ) -> std::io::Result<Self> {
        let input_dir = input_root.join(&id);
        tokio::fs::create_dir(&input_dir).await?;
        log::debug!("Created input dir {}", input_dir.display());

        Ok(Self {
            output_dir: output_root.join(&id),
            input_dir,
            id,
        })
    }

    /// Path of the `index`-th downloaded image.
    pub fn input_file(&self, index: usize) -> PathBuf {
        self.input_dir.join(format!("{index}.jpg"))
    }
}
