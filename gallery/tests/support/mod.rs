//! In-memory platform primitives for driving the save pipeline.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use shutterkit_gallery::backend::{FileStore, MediaProvider, MediaRecord, WriteStream};
use shutterkit_gallery::{AlbumCatalog, AlbumHandle, AssetHandle, SaveRequest};
use shutterkit_permission::{AccessScope, CapabilityGrant, PermissionBackend, PromptTicket};

pub const PICTURES: &str = "/storage/emulated/0/Pictures";

pub fn png_bytes() -> Vec<u8> {
    let image = RgbaImage::from_pixel(4, 4, Rgba([255, 128, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn sunset() -> SaveRequest {
    SaveRequest::new(png_bytes(), "sunset", "png", "image/png")
}

/// Permission primitives with scripted grants; prompts wait for [`answer`].
///
/// [`answer`]: FakePermissions::answer
#[derive(Default)]
pub struct FakePermissions {
    declared: Mutex<HashSet<String>>,
    grants: Mutex<HashMap<AccessScope, CapabilityGrant>>,
    queried: Mutex<Vec<AccessScope>>,
    tickets: Mutex<Vec<PromptTicket>>,
}

impl FakePermissions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn declare(self: &Arc<Self>, declaration: &str) -> Arc<Self> {
        self.declared.lock().unwrap().insert(declaration.to_owned());
        self.clone()
    }

    pub fn grant(self: &Arc<Self>, scope: AccessScope, grant: CapabilityGrant) -> Arc<Self> {
        self.grants.lock().unwrap().insert(scope, grant);
        self.clone()
    }

    pub fn queried(&self) -> Vec<AccessScope> {
        self.queried.lock().unwrap().clone()
    }

    pub fn prompted(&self) -> Vec<AccessScope> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .map(PromptTicket::scope)
            .collect()
    }

    /// Answer the oldest outstanding prompt.
    pub fn answer(&self, grant: CapabilityGrant) -> bool {
        let ticket = self.tickets.lock().unwrap().remove(0);
        ticket.respond(grant)
    }

    /// Answer the newest outstanding prompt.
    pub fn answer_latest(&self, grant: CapabilityGrant) -> bool {
        let ticket = self.tickets.lock().unwrap().pop().unwrap();
        ticket.respond(grant)
    }
}

impl PermissionBackend for FakePermissions {
    fn is_declared(&self, declaration: &str) -> bool {
        self.declared.lock().unwrap().contains(declaration)
    }

    fn query(&self, scope: AccessScope) -> CapabilityGrant {
        self.queried.lock().unwrap().push(scope);
        self.grants
            .lock()
            .unwrap()
            .get(&scope)
            .copied()
            .unwrap_or(CapabilityGrant::Unknown)
    }

    fn request(&self, _scope: AccessScope, ticket: PromptTicket) {
        self.tickets.lock().unwrap().push(ticket);
    }
}

type Disk = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

struct DiskWriter {
    path: PathBuf,
    disk: Disk,
    fail_after: Option<usize>,
}

impl Write for DiskWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut disk = self.disk.lock().unwrap();
        let file = disk.entry(self.path.clone()).or_default();
        if let Some(limit) = self.fail_after {
            let room = limit.saturating_sub(file.len());
            if room == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let taken = room.min(buf.len());
            file.extend_from_slice(&buf[..taken]);
            return Ok(taken);
        }
        file.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A filesystem held in memory.
#[derive(Default)]
pub struct MemoryFiles {
    pub(crate) dirs: Mutex<HashSet<PathBuf>>,
    pub(crate) disk: Disk,
    pub(crate) scanned: Mutex<Vec<(PathBuf, String)>>,
    pub(crate) calls: AtomicUsize,
    pub(crate) opened: AtomicUsize,
    pub refuse_mkdir: bool,
    pub fail_writes_after: Option<usize>,
    pub keep_partial_files: bool,
    /// Report every file (a path with an extension) as already present.
    pub report_files_present: bool,
    /// Fail every open with `AlreadyExists`, as if another writer won the name.
    pub lose_create_race: bool,
}

impl MemoryFiles {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.lock().unwrap().contains(path.as_ref())
    }

    pub fn files(&self) -> HashMap<PathBuf, Vec<u8>> {
        self.disk.lock().unwrap().clone()
    }

    pub fn scanned(&self) -> Vec<(PathBuf, String)> {
        self.scanned.lock().unwrap().clone()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl FileStore for MemoryFiles {
    fn pictures_root(&self) -> Option<PathBuf> {
        self.touch();
        Some(PathBuf::from(PICTURES))
    }

    fn exists(&self, path: &Path) -> bool {
        self.touch();
        if self.report_files_present && path.extension().is_some() {
            return true;
        }
        self.dirs.lock().unwrap().contains(path) || self.disk.lock().unwrap().contains_key(path)
    }

    fn create_directories(&self, path: &Path) -> bool {
        self.touch();
        if self.refuse_mkdir {
            return false;
        }
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        true
    }

    fn open_file_for_write(&self, path: &Path) -> io::Result<WriteStream> {
        self.touch();
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.lose_create_race {
            return Err(io::ErrorKind::AlreadyExists.into());
        }
        let mut disk = self.disk.lock().unwrap();
        if disk.contains_key(path) {
            return Err(io::ErrorKind::AlreadyExists.into());
        }
        disk.insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(DiskWriter {
            path: path.to_path_buf(),
            disk: self.disk.clone(),
            fail_after: self.fail_writes_after,
        }))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.touch();
        if self.keep_partial_files {
            return Err(io::ErrorKind::PermissionDenied.into());
        }
        self.disk
            .lock()
            .unwrap()
            .remove(path)
            .map(drop)
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }

    fn notify_media_index(&self, path: &Path, mime_type: &str) {
        self.touch();
        self.scanned
            .lock()
            .unwrap()
            .push((path.to_path_buf(), mime_type.to_owned()));
    }
}

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub record: MediaRecord,
    pub pending: bool,
}

/// A media provider held in memory.
#[derive(Default)]
pub struct MemoryMediaStore {
    pub(crate) records: Mutex<Vec<StoredRecord>>,
    pub(crate) disk: Disk,
    pub(crate) inserts: AtomicUsize,
    pub refuse_insert: bool,
    pub refuse_stream: bool,
    pub fail_writes_after: Option<usize>,
    pub lose_updates: bool,
}

impl MemoryMediaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn bytes(&self, handle: &str) -> Option<Vec<u8>> {
        self.disk.lock().unwrap().get(Path::new(handle)).cloned()
    }

    fn index(handle: &AssetHandle) -> Option<usize> {
        handle.as_str().rsplit('/').next()?.parse().ok()
    }
}

impl MediaProvider for MemoryMediaStore {
    fn insert_pending_media_record(&self, record: &MediaRecord) -> Option<AssetHandle> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.refuse_insert {
            return None;
        }
        let mut records = self.records.lock().unwrap();
        records.push(StoredRecord {
            record: record.clone(),
            pending: record.pending,
        });
        Some(AssetHandle::new(format!(
            "content://media/external/images/media/{}",
            records.len() - 1
        )))
    }

    fn open_stream_for_handle(&self, handle: &AssetHandle) -> Option<WriteStream> {
        if self.refuse_stream {
            return None;
        }
        Some(Box::new(DiskWriter {
            path: PathBuf::from(handle.as_str()),
            disk: self.disk.clone(),
            fail_after: self.fail_writes_after,
        }))
    }

    fn update_record_pending_flag(&self, handle: &AssetHandle, pending: bool) -> usize {
        if self.lose_updates {
            return 0;
        }
        let mut records = self.records.lock().unwrap();
        match Self::index(handle).and_then(|i| records.get_mut(i)) {
            Some(stored) => {
                stored.pending = pending;
                1
            }
            None => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Album {
    pub handle: AlbumHandle,
    pub title: String,
    pub assets: Vec<AssetHandle>,
}

/// A photo library's album list held in memory.
///
/// With a barrier installed, each lookup waits for a peer lookup before
/// returning, forcing concurrent saves to miss each other's new album.
#[derive(Default)]
pub struct MemoryAlbums {
    albums: Mutex<Vec<Album>>,
    pub lookup_barrier: Option<Barrier>,
}

impl MemoryAlbums {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn racing(peers: usize) -> Arc<Self> {
        Arc::new(Self {
            lookup_barrier: Some(Barrier::new(peers)),
            ..Self::default()
        })
    }

    pub fn albums(&self) -> Vec<Album> {
        self.albums.lock().unwrap().clone()
    }
}

impl AlbumCatalog for MemoryAlbums {
    fn find_album(&self, name: &str) -> Option<AlbumHandle> {
        let found = self
            .albums
            .lock()
            .unwrap()
            .iter()
            .find(|album| album.title == name)
            .map(|album| album.handle.clone());
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait();
        }
        found
    }

    fn create_album(&self, name: &str, initial_assets: &[AssetHandle]) -> io::Result<AlbumHandle> {
        let mut albums = self.albums.lock().unwrap();
        let handle = AlbumHandle::new(format!("album-{}", albums.len()));
        albums.push(Album {
            handle: handle.clone(),
            title: name.to_owned(),
            assets: initial_assets.to_vec(),
        });
        Ok(handle)
    }

    fn add_assets_to_album(&self, album: &AlbumHandle, assets: &[AssetHandle]) -> io::Result<()> {
        let mut albums = self.albums.lock().unwrap();
        let album = albums
            .iter_mut()
            .find(|candidate| &candidate.handle == album)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        album.assets.extend_from_slice(assets);
        Ok(())
    }
}
