//! 字符设备注册表
//!
//! [`ChrdevOps`] 的内存实现，记录四类资源：
//!
//! 1. 设备号区间（动态主设备号从 [`CHRDEV_MAJOR_DYN_START`] 向下分配）
//! 2. 设备类（`/sys/class/<class>`）
//! 3. cdev 绑定（设备号 → [`CharDriver`]）
//! 4. 设备节点（`/dev/<name>`）
//!
//! 用户空间只能通过已发布的设备节点打开设备，见 [`CharDevRegistry::open`]。

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use sync::SpinLock;

use crate::devno::{CHRDEV_MAJOR_DYN_END, CHRDEV_MAJOR_DYN_START, MINORMASK};
use crate::{
    CharDeviceFile, CharDriver, ChrdevOps, ClassId, FsError, OpenFlags, major, makedev, minor,
};

struct Region {
    major: u32,
    first_minor: u32,
    count: u32,
    name: String,
}

impl Region {
    fn contains(&self, dev: u64, count: u32) -> bool {
        let min = minor(dev);
        major(dev) == self.major
            && min >= self.first_minor
            && min as u64 + count as u64 <= self.first_minor as u64 + self.count as u64
    }
}

struct Class {
    id: ClassId,
    name: String,
}

struct Cdev {
    dev: u64,
    count: u32,
    driver: Arc<dyn CharDriver>,
}

struct Node {
    class: ClassId,
    dev: u64,
    name: String,
}

#[derive(Default)]
struct RegistryInner {
    regions: Vec<Region>,
    classes: Vec<Class>,
    cdevs: Vec<Cdev>,
    nodes: Vec<Node>,
    next_class_id: u32,
}

impl RegistryInner {
    fn driver_for(&self, dev: u64) -> Option<Arc<dyn CharDriver>> {
        self.cdevs
            .iter()
            .find(|c| {
                major(c.dev) == major(dev)
                    && minor(dev) >= minor(c.dev)
                    && minor(dev) - minor(c.dev) < c.count
            })
            .map(|c| c.driver.clone())
    }
}

/// 字符设备注册表
///
/// 所有操作在一把自旋锁内完成；驱动的回调（open 等）在锁外调用。
pub struct CharDevRegistry {
    inner: SpinLock<RegistryInner>,
}

impl CharDevRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            inner: SpinLock::new(RegistryInner::default()),
        }
    }

    /// 按节点名查找设备号
    pub fn lookup_node(&self, name: &str) -> Option<u64> {
        let inner = self.inner.lock();
        inner.nodes.iter().find(|n| n.name == name).map(|n| n.dev)
    }

    /// 已发布的节点名
    pub fn node_names(&self) -> Vec<String> {
        let inner = self.inner.lock();
        inner.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// 设备类是否存在
    pub fn class_exists(&self, name: &str) -> bool {
        self.inner.lock().classes.iter().any(|c| c.name == name)
    }

    /// 已保留的设备号区间数
    pub fn region_count(&self) -> usize {
        self.inner.lock().regions.len()
    }

    /// cdev 绑定数
    pub fn cdev_count(&self) -> usize {
        self.inner.lock().cdevs.len()
    }

    /// sysfs 的 `dev` 属性：`/sys/class/<class>/<node>/dev` 的内容
    pub fn sysfs_dev(&self, class: &str, node: &str) -> Option<String> {
        let inner = self.inner.lock();
        let class = inner.classes.iter().find(|c| c.name == class)?;
        let node = inner
            .nodes
            .iter()
            .find(|n| n.class == class.id && n.name == node)?;
        Some(format!("{}:{}\n", major(node.dev), minor(node.dev)))
    }

    /// 打开 `/dev/<name>`
    ///
    /// 依次解析节点 → 设备号 → 绑定的驱动，然后调用驱动的 open。
    pub fn open(&self, name: &str, flags: OpenFlags) -> Result<CharDeviceFile, FsError> {
        let (dev, driver) = {
            let inner = self.inner.lock();
            let node = inner
                .nodes
                .iter()
                .find(|n| n.name == name)
                .ok_or(FsError::NotFound)?;
            let driver = inner.driver_for(node.dev).ok_or(FsError::NoDevice)?;
            (node.dev, driver)
        };

        driver.open()?;
        Ok(CharDeviceFile::new(dev, driver, flags))
    }
}

impl Default for CharDevRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChrdevOps for CharDevRegistry {
    fn alloc_chrdev_region(
        &self,
        first_minor: u32,
        count: u32,
        name: &str,
    ) -> Result<u64, FsError> {
        if count == 0 || first_minor as u64 + count as u64 > MINORMASK as u64 + 1 {
            return Err(FsError::InvalidArgument);
        }

        let mut inner = self.inner.lock();
        let major = (CHRDEV_MAJOR_DYN_END..=CHRDEV_MAJOR_DYN_START)
            .rev()
            .find(|m| inner.regions.iter().all(|r| r.major != *m))
            .ok_or(FsError::Busy)?;

        inner.regions.push(Region {
            major,
            first_minor,
            count,
            name: String::from(name),
        });
        log::debug!("chrdev: region {}:{}+{} for {}", major, first_minor, count, name);
        Ok(makedev(major, first_minor))
    }

    fn unregister_chrdev_region(&self, first: u64, count: u32) {
        let mut inner = self.inner.lock();
        let pos = inner.regions.iter().position(|r| {
            r.major == major(first) && r.first_minor == minor(first) && r.count == count
        });
        match pos {
            Some(pos) => {
                let region = inner.regions.remove(pos);
                log::debug!("chrdev: released region {} of {}", region.major, region.name);
            }
            None => log::error!(
                "chrdev: releasing unknown region {}:{}+{}",
                major(first),
                minor(first),
                count
            ),
        }
    }

    fn class_create(&self, name: &str) -> Result<ClassId, FsError> {
        let mut inner = self.inner.lock();
        if inner.classes.iter().any(|c| c.name == name) {
            return Err(FsError::AlreadyExists);
        }
        let id = ClassId(inner.next_class_id);
        inner.next_class_id += 1;
        inner.classes.push(Class {
            id,
            name: String::from(name),
        });
        Ok(id)
    }

    fn class_destroy(&self, class: ClassId) {
        let mut inner = self.inner.lock();
        if inner.nodes.iter().any(|n| n.class == class) {
            log::error!("chrdev: destroying class {:?} with live nodes", class);
        }
        let before = inner.classes.len();
        inner.classes.retain(|c| c.id != class);
        if inner.classes.len() == before {
            log::error!("chrdev: destroying unknown class {:?}", class);
        }
    }

    fn cdev_add(&self, dev: u64, count: u32, driver: Arc<dyn CharDriver>) -> Result<(), FsError> {
        let mut inner = self.inner.lock();
        if !inner.regions.iter().any(|r| r.contains(dev, count)) {
            return Err(FsError::NoDevice);
        }
        if inner.driver_for(dev).is_some() {
            return Err(FsError::Busy);
        }
        inner.cdevs.push(Cdev { dev, count, driver });
        Ok(())
    }

    fn cdev_del(&self, dev: u64) {
        let mut inner = self.inner.lock();
        let before = inner.cdevs.len();
        inner.cdevs.retain(|c| c.dev != dev);
        if inner.cdevs.len() == before {
            log::error!("chrdev: deleting unbound cdev {}:{}", major(dev), minor(dev));
        }
    }

    fn device_create(&self, class: ClassId, dev: u64, name: &str) -> Result<(), FsError> {
        let mut inner = self.inner.lock();
        if !inner.classes.iter().any(|c| c.id == class) {
            return Err(FsError::NotFound);
        }
        if inner.driver_for(dev).is_none() {
            return Err(FsError::NoDevice);
        }
        if inner.nodes.iter().any(|n| n.name == name || n.dev == dev) {
            return Err(FsError::AlreadyExists);
        }
        inner.nodes.push(Node {
            class,
            dev,
            name: String::from(name),
        });
        Ok(())
    }

    fn device_destroy(&self, class: ClassId, dev: u64) {
        let mut inner = self.inner.lock();
        let before = inner.nodes.len();
        inner.nodes.retain(|n| !(n.class == class && n.dev == dev));
        if inner.nodes.len() == before {
            log::error!("chrdev: destroying unknown node {}:{}", major(dev), minor(dev));
        }
    }
}
