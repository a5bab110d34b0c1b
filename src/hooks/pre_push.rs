//! Parsing of the ref update lines git feeds the pre-push hook on stdin:
//!
//! ```text
//! <local ref> SP <local sha1> SP <remote ref> SP <remote sha1> LF
//! ```

use git2::Oid;
use std::io::BufRead;

use crate::error::EnvironmentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub local_ref: String,
    pub local_oid: Oid,
    pub remote_ref: String,
    pub remote_oid: Oid,
}

impl RefUpdate {
    pub fn parse(line: &str) -> Result<Self, EnvironmentError> {
        let malformed = || EnvironmentError::RefLine(line.to_string());

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [local_ref, local_sha, remote_ref, remote_sha] = fields.as_slice() else {
            return Err(malformed());
        };

        Ok(Self {
            local_ref: local_ref.to_string(),
            local_oid: Oid::from_str(local_sha).map_err(|_| malformed())?,
            remote_ref: remote_ref.to_string(),
            remote_oid: Oid::from_str(remote_sha).map_err(|_| malformed())?,
        })
    }

    /// The remote ref is being deleted; nothing is pushed.
    pub fn is_delete(&self) -> bool {
        self.local_oid.is_zero()
    }

    /// The remote does not have this ref yet.
    pub fn is_new_branch(&self) -> bool {
        self.remote_oid.is_zero()
    }
}

/// Read every non-blank ref update line from `reader`
pub fn read_ref_updates<R: BufRead>(reader: R) -> Result<Vec<RefUpdate>, EnvironmentError> {
    let mut updates = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| EnvironmentError::RefLine(format!("<stdin: {e}>")))?;
        if line.trim().is_empty() {
            continue;
        }
        updates.push(RefUpdate::parse(&line)?);
    }
    Ok(updates)
}
