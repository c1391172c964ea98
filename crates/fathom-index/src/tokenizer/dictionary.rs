//! Curated dictionary of common multi-character Chinese terms used by
//! longest-match segmentation.

use std::collections::HashSet;
use std::sync::OnceLock;

const COMMON_WORDS: &[&str] = &[
    "计算机", "人工智能", "机器学习", "深度学习", "神经网络", "算法", "数据", "分析", "处理",
    "系统", "技术", "方法", "模型", "训练", "预测", "优化", "自然语言", "图像识别", "语音识别",
    "推荐系统", "搜索引擎", "大数据", "云计算", "区块链", "物联网", "网络安全", "软件工程",
    "数据库", "编程语言", "开发", "应用", "平台", "框架", "工具", "服务", "产品", "用户",
    "客户", "市场", "商业", "企业", "公司", "团队", "项目", "管理", "运营", "策略", "规划",
    "设计", "创新", "研究",
];

/// Longest dictionary entry, in characters.
pub(crate) const MAX_WORD_CHARS: usize = 4;

pub(crate) fn dictionary() -> &'static HashSet<&'static str> {
    static DICT: OnceLock<HashSet<&'static str>> = OnceLock::new();
    DICT.get_or_init(|| COMMON_WORDS.iter().copied().collect())
}
