//! Seed stopword lists. Runtime additions/removals go through
//! [`super::Tokenizer::add_stopwords`] / [`super::Tokenizer::remove_stopwords`].

pub(crate) const ENGLISH: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "this", "but", "they",
    "have", "had", "what", "said", "each", "which", "she", "do", "how", "their", "if", "up", "out",
    "many", "then", "them", "these", "so", "some", "her", "would", "make", "like", "into", "him",
    "time", "two", "more", "go", "no", "way", "could", "my", "than", "first", "been", "call",
    "who", "oil", "sit", "now", "find", "down", "day", "did", "get", "come", "made", "may", "part",
];

pub(crate) const CHINESE: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "那", "它",
    "他", "她", "我们", "你们", "他们", "这个", "那个", "什么", "怎么", "为什么", "因为", "所以",
    "但是", "然后", "如果", "虽然", "可是", "而且", "或者", "比如", "关于", "对于", "根据",
    "按照", "除了", "包括", "特别", "尤其", "另外", "首先", "其次", "最后", "总之", "因此",
    "于是", "然而", "不过", "尽管", "即使",
];
