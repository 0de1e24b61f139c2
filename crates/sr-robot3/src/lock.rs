//! 单实例文件锁
//!
//! 同一台机器上只允许一个 `Robot` 运行。进程崩溃时操作系统会自动释放锁。

use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// 默认锁文件路径：`<临时目录>/sr-robot3.lock`
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join("sr-robot3.lock")
}

/// 单实例文件锁
#[derive(Debug)]
pub struct RobotLock {
    file: File,
    path: PathBuf,
}

impl RobotLock {
    /// 尝试获取锁（非阻塞）
    ///
    /// # 返回
    /// - `Ok(Self)`: 成功获取锁，文件内容为当前进程 PID
    /// - `Err` (`ErrorKind::AlreadyExists`): 锁已被其他实例持有
    /// - `Err`: 文件操作失败
    pub fn try_lock(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        // 拿到锁之前不能截断文件
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .read(true)
            .open(path)?;

        if !file.try_lock_exclusive()? {
            let message = match read_pid(&mut file) {
                Some(pid) => format!("Robot is already running (locked by PID {})", pid),
                None => "Robot is already running (locked)".to_string(),
            };
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, message));
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(&file, "{}", std::process::id())?;
        file.sync_all()?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 读取锁文件中记录的持有者 PID
///
/// 文件不存在、为空（持有者还没写入）或内容不是 PID 时返回 `None`。
pub fn holder_pid(path: impl AsRef<Path>) -> Option<u32> {
    let mut file = File::open(path).ok()?;
    read_pid(&mut file)
}

fn read_pid(file: &mut File) -> Option<u32> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut content).ok()?;
    content.trim().parse().ok()
}

impl Drop for RobotLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
