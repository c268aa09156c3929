// ============================================================================
// STOCKAGE DES FICHIERS AUDIO
// ============================================================================
//
// Description:
//   Enregistre les fichiers uploadés sous un nom unique (UUID v4 + extension
//   d'origine), les relit pour le streaming et les supprime.
//
// Points d'attention:
//   - Le dossier est créé s'il n'existe pas
//   - Un nom contenant un séparateur ou ".." est refusé (NotFound)
//   - delete_file ne renvoie jamais d'erreur sur un fichier absent
//
// ============================================================================

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Fichier ouvert en lecture, avec sa taille pour le Content-Length
pub struct StoredFile {
    pub name: String,
    pub file: File,
    pub len: u64,
}

/// Écrit le contenu dans `dir` et retourne le nom généré
pub async fn save_file(dir: &Path, content: &[u8], original_name: Option<&str>) -> std::io::Result<String> {
    fs::create_dir_all(dir).await?;

    let file_name = format!("{}{}", Uuid::new_v4(), file_extension(original_name));
    fs::write(dir.join(&file_name), content).await?;

    debug!(file_name, bytes = content.len(), "File saved");
    Ok(file_name)
}

/// Ouvre un fichier stocké, NotFound si le chemin résolu n'existe pas
pub async fn load_file(dir: &Path, name: &str) -> AppResult<StoredFile> {
    let path = resolve(dir, name)
        .ok_or_else(|| AppError::NotFound(format!("File not found: {}", name)))?;

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File not found: {}", name)));
        }
        Err(e) => return Err(e.into()),
    };
    let len = file.metadata().await?.len();

    Ok(StoredFile {
        name: name.to_string(),
        file,
        len,
    })
}

/// Supprime un fichier stocké. Retourne true si un fichier a effectivement été supprimé.
pub async fn delete_file(dir: &Path, name: &str) -> bool {
    let Some(path) = resolve(dir, name) else {
        return false;
    };

    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!(name, "File deleted");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(name, error = %e, "Failed to delete file");
            false
        }
    }
}

fn resolve(dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return None;
    }
    Some(dir.join(name))
}

/// ".mp3" pour "track.mp3", "" si pas de nom ou pas de point
fn file_extension(original_name: Option<&str>) -> &str {
    original_name
        .and_then(|name| name.rfind('.').map(|idx| &name[idx..]))
        .unwrap_or("")
}
