use std::sync::Arc;

use thiserror::Error;

/// 需要启动/停止钩子的组件
pub trait Startable: Send + Sync {
    fn name(&self) -> &'static str;

    fn start(&self) -> anyhow::Result<()> {
        tracing::debug!("{} initialized", self.name());
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        tracing::debug!("{} stopped", self.name());
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("failed to start {name}: {source}")]
pub struct LifecycleError {
    pub name: &'static str,
    #[source]
    pub source: anyhow::Error,
}

// 按依赖顺序注册
#[derive(Default)]
pub struct Lifecycle {
    components: Vec<Arc<dyn Startable>>,
    started: usize,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: Arc<dyn Startable>) -> &mut Self {
        self.components.push(component);
        self
    }

    /// 按注册顺序启动；任一失败则逆序停止已启动的组件并返回错误
    pub fn start_all(&mut self) -> Result<(), LifecycleError> {
        while self.started < self.components.len() {
            let component = &self.components[self.started];
            if let Err(source) = component.start() {
                let name = component.name();
                tracing::error!("Failed to start {}: {:#}", name, source);
                self.stop_all();
                return Err(LifecycleError { name, source });
            }
            self.started += 1;
        }
        Ok(())
    }

    /// 逆序停止已启动的组件，错误只记录不中断
    pub fn stop_all(&mut self) {
        while self.started > 0 {
            self.started -= 1;
            let component = &self.components[self.started];
            if let Err(e) = component.stop() {
                tracing::warn!("Failed to stop {}: {:#}", component.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recorder {
        name: &'static str,
        fail_on_start: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Startable for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn start(&self) -> anyhow::Result<()> {
            if self.fail_on_start {
                anyhow::bail!("boom");
            }
            self.log.lock().unwrap().push(format!("start {}", self.name));
            Ok(())
        }

        fn stop(&self) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("stop {}", self.name));
            Ok(())
        }
    }

    fn recorder(
        name: &'static str,
        fail_on_start: bool,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn Startable> {
        Arc::new(Recorder {
            name,
            fail_on_start,
            log: log.clone(),
        })
    }

    #[test]
    fn starts_in_order_and_stops_in_reverse() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .register(recorder("repository", false, &log))
            .register(recorder("service", false, &log))
            .register(recorder("handler", false, &log));

        lifecycle.start_all().unwrap();
        lifecycle.stop_all();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "start repository",
                "start service",
                "start handler",
                "stop handler",
                "stop service",
                "stop repository",
            ]
        );
    }

    #[test]
    fn failed_start_rolls_back_started_components() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .register(recorder("repository", false, &log))
            .register(recorder("service", true, &log))
            .register(recorder("handler", false, &log));

        let err = lifecycle.start_all().unwrap_err();
        assert_eq!(err.name, "service");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["start repository", "stop repository"]
        );

        // 已回滚，再次停止不会重复调用
        lifecycle.stop_all();
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
