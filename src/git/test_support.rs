//! Throwaway repositories for unit tests

use git2::{Commit, Oid, Repository, Signature};
use std::path::Path;
use tempfile::TempDir;

use super::GitRepo;

pub struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> GitRepo {
        GitRepo::discover(self.path()).expect("discover test repository")
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn stage(&self, name: &str, content: &str) {
        self.write(name, content);
        let mut index = self.repo.index().expect("open index");
        index.add_path(Path::new(name)).expect("stage file");
        index.write().expect("write index");
    }

    pub fn commit(&self, message: &str) -> Oid {
        let signature = Signature::now("Shame Tester", "tester@example.com").expect("signature");
        let mut index = self.repo.index().expect("open index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        let parents: Vec<Commit<'_>> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("peel HEAD")],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .expect("create commit")
    }
}
